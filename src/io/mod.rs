pub mod csv;
pub mod yaml;

pub use self::csv::{write_trajectory, write_trajectory_file};
pub use self::yaml::{read_qoi_file, write_qoi, write_qoi_file};
