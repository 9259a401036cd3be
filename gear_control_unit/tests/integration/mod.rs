mod harness;
mod invariants;
mod lifecycle;
