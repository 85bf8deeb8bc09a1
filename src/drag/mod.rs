pub mod curves;
pub mod interp;
pub mod table;

pub use curves::DragCurve;
pub use interp::interp_clamped;
pub use table::{DragColumn, DragSample, DragTable};
