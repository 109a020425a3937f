//! Game session controller.
//!
//! A session owns one game and drives it through
//! `AwaitingMove(side)` until `Terminal(outcome)`. In vs-AI mode the
//! computer's reply is played inside the same call that applied the
//! human move, so callers never observe the AI's turn.

use crate::game::{GameOutcome, TurnBasedGame};
use crate::opponent::Opponent;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Who controls the second side.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Mode {
    /// Two humans share the board.
    #[serde(rename = "pvp")]
    #[strum(serialize = "pvp")]
    #[default]
    Pvp,
    /// The second side is played by the computer.
    #[serde(rename = "vs-ai", alias = "vs_ai", alias = "ai", alias = "cpu")]
    #[strum(to_string = "vs-ai", serialize = "vs_ai", serialize = "ai", serialize = "cpu")]
    VsAi,
}

/// Controller state, derived from the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<S> {
    /// Waiting for this side to move.
    AwaitingMove(S),
    /// The game has ended.
    Terminal(GameOutcome<S>),
}

/// What happened to an accepted move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReport<M, S> {
    /// The move was played, followed by the computer's reply if one was due.
    Applied {
        /// Move the computer answered with.
        ai_reply: Option<M>,
    },
    /// The game had already ended; nothing changed.
    AlreadyOver(GameOutcome<S>),
}

/// Why a session refused a request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The move breaks the rules in the current state. Nothing changed.
    #[display("Illegal move: {}", _0)]
    IllegalMove(String),
    /// The request does not describe a move for this kind of game.
    #[display("Invalid move input: {}", _0)]
    InvalidInput(String),
    /// The computer opponent failed to produce a move.
    #[display("Opponent failure: {}", _0)]
    Opponent(String),
}

impl std::error::Error for SessionError {}

/// One game plus whatever plays its computer side.
#[derive(Debug, Clone)]
pub struct GameSession<G: TurnBasedGame, O> {
    initial: G,
    game: G,
    mode: Mode,
    ai_side: G::Side,
    opponent: O,
    rng: StdRng,
    last_ai_move: Option<G::Move>,
}

impl<G, O> GameSession<G, O>
where
    G: TurnBasedGame,
    O: Opponent<G>,
{
    /// Starts a session from `game`. If the computer is to move first it
    /// moves before this returns.
    #[instrument(skip_all, fields(mode = %mode, ai_side = %ai_side))]
    pub fn new(
        game: G,
        mode: Mode,
        ai_side: G::Side,
        opponent: O,
        rng: StdRng,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            initial: game.clone(),
            game,
            mode,
            ai_side,
            opponent,
            rng,
            last_ai_move: None,
        };
        session.last_ai_move = session.ai_turn()?;
        Ok(session)
    }

    /// Current game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Who plays the second side.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Side the computer plays in vs-AI mode.
    pub fn ai_side(&self) -> G::Side {
        self.ai_side
    }

    /// Opponent driving the computer side.
    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    /// The computer's most recent move since the last human move or reset.
    pub fn last_ai_move(&self) -> Option<G::Move> {
        self.last_ai_move
    }

    /// Current result.
    pub fn outcome(&self) -> GameOutcome<G::Side> {
        self.game.outcome()
    }

    /// Current controller state.
    pub fn state(&self) -> SessionState<G::Side> {
        match self.game.outcome() {
            GameOutcome::InProgress => SessionState::AwaitingMove(self.game.side_to_move()),
            outcome => SessionState::Terminal(outcome),
        }
    }

    /// Plays a move for the side to move, then lets the computer answer.
    ///
    /// On a finished game this is a no-op reported as
    /// [`MoveReport::AlreadyOver`]. An illegal move leaves the session
    /// unchanged.
    #[instrument(skip_all, fields(mv = %mv))]
    pub fn apply_move(&mut self, mv: G::Move) -> Result<MoveReport<G::Move, G::Side>, SessionError> {
        let outcome = self.game.outcome();
        if outcome.is_terminal() {
            debug!(?outcome, "Move on finished session ignored");
            return Ok(MoveReport::AlreadyOver(outcome));
        }

        self.game.apply_move(mv).map_err(|e| {
            warn!(error = %e, "Illegal move");
            SessionError::IllegalMove(e.to_string())
        })?;

        let ai_reply = self.ai_turn()?;
        self.last_ai_move = ai_reply;

        info!(
            ai_reply = ?ai_reply,
            outcome = ?self.game.outcome(),
            "Move applied"
        );
        Ok(MoveReport::Applied { ai_reply })
    }

    /// Restores the starting position. The computer opens again if it moves first.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.game = self.initial.clone();
        self.last_ai_move = None;
        self.last_ai_move = self.ai_turn()?;
        info!("Session reset");
        Ok(())
    }

    /// Plays the computer's move if it is due.
    fn ai_turn(&mut self) -> Result<Option<G::Move>, SessionError> {
        if self.mode != Mode::VsAi
            || self.game.outcome().is_terminal()
            || self.game.side_to_move() != self.ai_side
        {
            return Ok(None);
        }

        let mv = self
            .opponent
            .choose(&self.game, &mut self.rng)
            .map_err(|e| SessionError::Opponent(e.to_string()))?;
        self.game
            .apply_move(mv)
            .map_err(|e| SessionError::Opponent(e.to_string()))?;
        debug!(mv = %mv, "Computer moved");
        Ok(Some(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::MinimaxOpponent;
    use playroom_tictactoe::{AnyGame, Player, Position};
    use rand::SeedableRng;

    fn tictactoe(mode: Mode) -> GameSession<AnyGame, MinimaxOpponent> {
        GameSession::new(
            AnyGame::new(),
            mode,
            Player::O,
            MinimaxOpponent,
            StdRng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let session = tictactoe(Mode::VsAi);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
        assert_eq!(session.last_ai_move(), None);
    }

    #[test]
    fn test_ai_replies_in_same_call() {
        let mut session = tictactoe(Mode::VsAi);
        let report = session.apply_move(Position::Center).unwrap();
        let MoveReport::Applied { ai_reply: Some(reply) } = report else {
            panic!("expected an AI reply, got {report:?}");
        };
        assert_ne!(reply, Position::Center);
        assert_eq!(session.game().history().len(), 2);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
    }

    #[test]
    fn test_ai_opens_when_it_moves_first() {
        let session = GameSession::new(
            AnyGame::new(),
            Mode::VsAi,
            Player::X,
            MinimaxOpponent,
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(session.game().history().len(), 1);
        assert!(session.last_ai_move().is_some());
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::O));
    }

    #[test]
    fn test_reset_restores_start() {
        let mut session = tictactoe(Mode::VsAi);
        session.apply_move(Position::TopLeft).unwrap();
        session.reset().unwrap();
        assert!(session.game().history().is_empty());
        assert_eq!(session.last_ai_move(), None);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("cpu".parse::<Mode>().unwrap(), Mode::VsAi);
        assert_eq!(Mode::VsAi.to_string(), "vs-ai");
        let mode: Mode = serde_json::from_str("\"vs_ai\"").unwrap();
        assert_eq!(mode, Mode::VsAi);
    }
}
