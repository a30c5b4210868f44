pub mod height;

pub use height::HeightGenerator;
