pub mod extract;
pub mod feedback;
pub mod probes;
