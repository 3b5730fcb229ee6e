use anyhow::Result;
use wordbeam::testing::*;
use wordbeam::{Runner, Sum, from_vec};

fn ones(words: &[&str]) -> Vec<(String, u64)> {
    words.iter().map(|w| (w.to_string(), 1)).collect()
}

#[test]
fn map_and_flat_map_chain() -> Result<()> {
    let p = TestPipeline::new();
    let lines = from_vec(
        &p,
        vec![
            "The quick brown fox".to_string(),
            "jumps over the lazy dog".to_string(),
        ],
    );

    let out = lines
        .flat_map(|s: &String| {
            s.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .map(|w: &String| w.len())
        .collect_seq()?;

    assert_collections_equal(&out, &[3, 5, 5, 3, 5, 4, 3, 4, 3]);
    Ok(())
}

#[test]
fn group_by_key_collects_every_value_once() -> Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, ones(&["a", "b", "a", "c", "b"]))
        .group_by_key()
        .collect_par(None, Some(3))?;

    assert_grouped_kv_equal(
        out,
        vec![
            ("a".to_string(), vec![1, 1]),
            ("b".to_string(), vec![1, 1]),
            ("c".to_string(), vec![1]),
        ],
    );
    Ok(())
}

#[test]
fn partial_combine_folds_within_a_partition_only() -> Result<()> {
    let p = TestPipeline::new();
    let words = ones(&["a", "b", "a", "a", "b", "a"]);

    let single = from_vec(&p, words.clone())
        .combine_partial(Sum::<u64>::new())
        .collect_seq_sorted()?;
    assert_eq!(single, vec![("a".to_string(), 4), ("b".to_string(), 2)]);

    // Two partitions of three: [a b a] and [a b a].
    let split = from_vec(&p, words)
        .combine_partial(Sum::<u64>::new())
        .collect_par_sorted(Some(2), Some(2))?;
    assert_eq!(
        split,
        vec![
            ("a".to_string(), 2),
            ("a".to_string(), 2),
            ("b".to_string(), 1),
            ("b".to_string(), 1),
        ]
    );
    Ok(())
}

#[test]
fn partial_combine_then_group_matches_plain_grouping() -> Result<()> {
    let p = TestPipeline::new();
    let tokens: Vec<(String, u64)> = (0..20_000)
        .map(|i| (format!("w{}", i % 137), 1))
        .collect();
    let totals = |grouped: Vec<(String, Vec<u64>)>| -> Vec<(String, u64)> {
        let mut v: Vec<_> = grouped
            .into_iter()
            .map(|(k, vs)| (k, vs.iter().sum()))
            .collect();
        v.sort();
        v
    };

    let plain = from_vec(&p, tokens.clone())
        .group_by_key()
        .collect_par(Some(4), Some(8))?;
    let combined = from_vec(&p, tokens)
        .combine_partial(Sum::<u64>::new())
        .group_by_key()
        .collect_par(Some(4), Some(8))?;

    assert!(combined.iter().all(|(_, vs)| vs.len() <= 8));
    let plain = totals(plain);
    assert_eq!(plain, totals(combined));
    assert_eq!(plain.len(), 137);
    Ok(())
}

#[test]
fn sequential_and_parallel_runs_are_equivalent() -> Result<()> {
    let p = TestPipeline::new();
    let nums: Vec<u64> = (0..5_000).collect();
    let build = |p: &TestPipeline| {
        from_vec(p, nums.clone())
            .map(|n: &u64| (format!("k{}", n % 17), *n))
            .group_by_key()
            .map(|(k, vs): &(String, Vec<u64>)| (k.clone(), vs.iter().sum::<u64>()))
    };

    let seq = build(&p).collect_seq_sorted()?;
    let par = build(&p).collect_par_sorted(Some(3), Some(7))?;
    assert_eq!(seq, par);
    assert_eq!(seq.iter().map(|(_, s)| s).sum::<u64>(), nums.iter().sum::<u64>());
    Ok(())
}

#[test]
fn empty_source_flows_through_barriers() -> Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, Vec::<(String, u64)>::new())
        .combine_partial(Sum::<u64>::new())
        .group_by_key()
        .collect_par(None, Some(8))?;
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn graph_grows_one_node_and_edge_per_stage() {
    let p = TestPipeline::new();
    let _ = from_vec(&p, vec![1u32, 2, 3])
        .map(|x: &u32| x + 1)
        .flat_map(|x: &u32| vec![*x; 2]);
    assert_eq!(p.node_count(), 3);
    assert_eq!(p.edge_count(), 2);
}

#[test]
fn collecting_with_the_wrong_type_is_an_error() {
    let p = TestPipeline::new();
    let strings = from_vec(&p, vec!["x".to_string()]);
    let err = Runner::sequential()
        .run_collect::<u32>(&p, strings.node_id())
        .expect_err("type mismatch must fail");
    assert!(err.to_string().contains("terminal type mismatch"));
}
