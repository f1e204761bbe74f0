/*!
 * Turn-taking rehearsal.
 *
 * - `session`: the session value and its state machine
 * - `controller`: drives a session through the speech ports
 */

pub mod controller;
pub mod session;

pub use self::controller::{RehearsalController, TurnOutcome};
pub use self::session::{Evaluation, RehearsalSession, SessionState};
