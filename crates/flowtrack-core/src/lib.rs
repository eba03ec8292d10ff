pub mod compensation;
pub mod consts;
pub mod error;
pub mod field;
pub mod filters;
pub mod flow;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod point;
pub mod track;
