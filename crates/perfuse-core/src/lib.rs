pub mod error;
pub mod consts;
pub mod volume;
pub mod io;
pub mod scaling;
pub mod difference;
pub mod quant;
pub mod external;
pub mod pipeline;
