mod blockchain;
mod lifecycle;
mod task;

pub use blockchain::*;
pub use lifecycle::*;
pub use task::*;
