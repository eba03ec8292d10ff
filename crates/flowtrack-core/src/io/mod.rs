pub mod flow_writer;
pub mod image_io;
pub mod ser;
