// Interaction graph — edge accumulation, reply-tree walking, GEXF export.

pub mod accumulator;
pub mod gexf;
pub mod walk;
