use crate::node::Node;
use crate::type_token::vec_ops_for;
use crate::{PCollection, Partition, RFBound};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

impl<K: RFBound + Eq + Hash, V: RFBound> PCollection<(K, V)> {
    /// Group values by key: (K, V) -> (K, Vec<V>)
    ///
    /// Every distinct key appears in exactly one output group, holding every
    /// value emitted for it. The order of groups, and of values inside a
    /// group, is unspecified.
    pub fn group_by_key(self) -> PCollection<(K, Vec<V>)> {
        let local = Arc::new(|p: Partition| -> Partition {
            let kv = *p.downcast::<Vec<(K, V)>>().expect("GBK local: bad input");
            let mut m: HashMap<K, Vec<V>> = HashMap::new();
            for (k, v) in kv {
                m.entry(k).or_default().push(v);
            }
            Box::new(m) as Partition
        });

        let merge = Arc::new(|parts: Vec<Partition>| -> Partition {
            let mut acc: HashMap<K, Vec<V>> = HashMap::new();
            for p in parts {
                let m = *p
                    .downcast::<HashMap<K, Vec<V>>>()
                    .expect("GBK merge: bad part");
                for (k, vs) in m {
                    acc.entry(k).or_default().extend(vs);
                }
            }
            Box::new(acc.into_iter().collect::<Vec<(K, Vec<V>)>>()) as Partition
        });

        let id = self.pipeline.insert_node(Node::GroupByKey {
            local,
            merge,
            out_ops: vec_ops_for::<(K, Vec<V>)>(),
        });
        self.pipeline.connect(self.id, id);
        PCollection::attach(self.pipeline, id)
    }
}
