pub(crate) mod collect_sorted;
pub(crate) mod combine;
pub(crate) mod keyed;
pub(crate) mod scoped;
pub(crate) mod stdlib;
