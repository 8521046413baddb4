/// Compositor seam and render outputs.
pub mod backend;
/// CPU compositor.
pub mod cpu;
/// Threaded debounce/cancel loop.
pub mod pipeline;
/// Clock-driven render state machine.
pub mod scheduler;
