mod batch;
mod compare;

pub use batch::run_batch;
pub use compare::run_compare;
