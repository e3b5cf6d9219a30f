/*!
 * # page-fx engine
 *
 * Platform-independent cores for the three page behaviors. Nothing in here
 * touches the DOM: each core takes plain values in (click outcomes,
 * intersection samples, pointer positions) and hands back either effects to
 * apply or strings to write into style properties. The web crate owns the
 * browser objects and interprets what the cores return.
 *
 * ## Module Structure
 *
 * - **`copy`**: copy-button state machine with cancellable revert tickets
 * - **`reveal`**: one-shot `Pending -> Revealed` tracker for content sections
 * - **`parallax`**: capability-gated hero parallax and its style math
 */

pub mod copy;
pub mod parallax;
pub mod reveal;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use copy::*;
pub use parallax::*;
pub use reveal::*;
