// Collection pipeline — the two-phase snowball driver.

pub mod collect;
