//! Pipeline latch interface.

/// An inter-stage pipeline register.
///
/// Latches must support flushing on a misprediction and reporting whether
/// they currently hold an instruction.
pub trait PipelineLatch {
    /// Discards the held instruction, leaving a bubble.
    fn flush(&mut self);

    /// Returns `true` if the latch holds a bubble.
    fn is_empty(&self) -> bool;

    /// Program counter of the held instruction.
    fn pc(&self) -> Option<u64>;

    /// Fetch sequence number of the held instruction.
    fn seq(&self) -> Option<u64>;
}
