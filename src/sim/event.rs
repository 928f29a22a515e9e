/// Events emitted by the snake engine.
/// The shell consumes these and turns them into scrollback lines.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// A fresh game is up and ticking.
    Started,
    /// Food eaten; the new total.
    Scored { score: u32 },
    /// Wall or body hit; ticker stopped, waiting for restart or quit.
    Crashed { score: u32 },
    /// Player quit; the instance is done for good.
    Terminated,
}
