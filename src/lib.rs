pub mod cli;
pub mod ctx;
pub mod error;
pub mod heatmap;
pub mod instability;
pub mod io;
pub mod pipeline;

pub mod math {
    pub mod round;
}

pub mod schema {
    pub mod v1;
}
