//! Interactive game session: read a guess, validate, submit, report.
//!
//! # Design
//! The controller owns the `GameApi` and the single game identifier. It is
//! strictly sequential: a line is read only after the previous request has
//! resolved, so the session state never sees concurrent mutation.
//!
//! Transitions:
//! `NoSession -> AwaitingInput -> AwaitingGuessResult -> (AwaitingInput | Terminated)`
//! and `NoSession -> Terminated` on an early exit. A failed game creation
//! leaves the controller in `NoSession`.

use std::io::{self, Write};

use mastermind_core::Guess;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::api::GameApi;

pub const BANNER: &str = "Welcome to Mastermind!
Guess the 4-digit code (digits 1-6).
B = correct digit in correct position
W = correct digit in wrong position
Type 'exit' to quit.
";

pub const PROMPT: &str = "> ";

const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    AwaitingInput,
    AwaitingGuessResult,
    Terminated,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Exited,
    /// No game could be created; nothing was played.
    CreationFailed,
}

/// Result of handling one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished(Outcome),
}

pub struct Controller<A, W> {
    api: A,
    out: W,
    game_id: Option<String>,
    state: SessionState,
}

impl<A, W> Controller<A, W>
where
    A: GameApi,
    W: Write,
{
    pub fn new(api: A, out: W) -> Self {
        Self {
            api,
            out,
            game_id: None,
            state: SessionState::NoSession,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Print the banner and create a game. Returns whether a game exists.
    pub async fn start(&mut self) -> io::Result<bool> {
        writeln!(self.out, "{BANNER}")?;

        match self.api.create_game().await {
            Ok(game_id) => {
                info!(%game_id, "game created");
                self.game_id = Some(game_id);
                self.state = SessionState::AwaitingInput;
                writeln!(self.out, "New game started. Enter your guess:")?;
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "game creation failed");
                writeln!(self.out, "Error starting game: {err}")?;
                Ok(false)
            }
        }
    }

    /// Handle one line of player input.
    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let input = line.trim();

        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            return self.exit().await.map(Flow::Finished);
        }

        let guess = match Guess::parse(input) {
            Ok(guess) => guess,
            Err(err) => {
                debug!(input, error = %err, "rejected guess");
                writeln!(self.out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };

        let Some(game_id) = self.game_id.clone() else {
            writeln!(self.out, "No active game. Please start a new game.")?;
            return Ok(Flow::Continue);
        };

        self.state = SessionState::AwaitingGuessResult;
        match self.api.submit_guess(&game_id, &guess).await {
            Ok(feedback) => {
                let printed = writeln!(self.out, "Feedback: {}", feedback.render());
                if feedback.is_win() {
                    let printed = printed
                        .and_then(|()| writeln!(self.out, "Congratulations! You guessed the code!"));
                    self.end_session().await;
                    report_unprinted(printed);
                    return Ok(Flow::Finished(Outcome::Won));
                }
                printed?;
            }
            Err(err) => {
                writeln!(self.out, "Error submitting guess: {err}")?;
            }
        }
        self.state = SessionState::AwaitingInput;
        Ok(Flow::Continue)
    }

    /// Drive a whole session from `input` until the game is won, the player
    /// exits, or input ends. End of input counts as `exit`.
    pub async fn run<R>(&mut self, input: R) -> io::Result<Outcome>
    where
        R: AsyncBufRead + Unpin,
    {
        if !self.start().await? {
            return Ok(Outcome::CreationFailed);
        }

        let mut lines = input.lines();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                debug!("input closed");
                return self.exit().await;
            };
            if let Flow::Finished(outcome) = self.handle_line(&line).await? {
                return Ok(outcome);
            }
        }
    }

    async fn exit(&mut self) -> io::Result<Outcome> {
        let printed = if self.game_id.is_some() {
            self.end_session().await;
            writeln!(self.out, "Game ended. Goodbye!")
        } else {
            self.state = SessionState::Terminated;
            writeln!(self.out, "Goodbye!")
        };
        report_unprinted(printed);
        Ok(Outcome::Exited)
    }

    /// Best-effort delete of the active game; failures are only logged.
    async fn end_session(&mut self) {
        if let Some(game_id) = self.game_id.take() {
            if let Err(err) = self.api.delete_game(&game_id).await {
                warn!(%game_id, error = %err, "failed to delete game");
            }
        }
        self.state = SessionState::Terminated;
    }
}

/// The session is already over when its closing lines are printed, so a
/// broken terminal must not turn a win or exit into a failure.
fn report_unprinted(printed: io::Result<()>) {
    if let Err(err) = printed {
        warn!(error = %err, "failed to print closing message");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mastermind_core::{ApiError, Feedback};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Request {
        Create,
        Guess(String, String),
        Delete(String),
    }

    /// Scripted `GameApi` recording every request.
    struct FakeApi {
        create: Result<String, ApiError>,
        replies: Mutex<VecDeque<Result<Feedback, ApiError>>>,
        delete: Result<(), ApiError>,
        requests: Mutex<Vec<Request>>,
    }

    impl FakeApi {
        fn new(game_id: &str) -> Self {
            Self {
                create: Ok(game_id.to_string()),
                replies: Mutex::new(VecDeque::new()),
                delete: Ok(()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing_create(err: ApiError) -> Self {
            Self {
                create: Err(err),
                ..Self::new("")
            }
        }

        fn reply(self, reply: Result<Feedback, ApiError>) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GameApi for FakeApi {
        async fn create_game(&self) -> Result<String, ApiError> {
            self.requests.lock().unwrap().push(Request::Create);
            self.create.clone()
        }

        async fn submit_guess(&self, game_id: &str, guess: &Guess) -> Result<Feedback, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push(Request::Guess(game_id.to_string(), guess.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted guess")
        }

        async fn delete_game(&self, game_id: &str) -> Result<(), ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push(Request::Delete(game_id.to_string()));
            self.delete.clone()
        }
    }

    /// Writer whose every write fails, like stdout after the pipe closes.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    /// A controller already holding `game_id`, skipping the banner.
    fn in_session<W: Write>(api: FakeApi, out: W) -> Controller<FakeApi, W> {
        let mut controller = Controller::new(api, out);
        controller.game_id = Some("abc123".to_string());
        controller.state = SessionState::AwaitingInput;
        controller
    }

    fn feedback(black: u32, white: u32) -> Result<Feedback, ApiError> {
        Ok(Feedback { black, white })
    }

    fn output(controller: Controller<FakeApi, Vec<u8>>) -> String {
        String::from_utf8(controller.into_output()).unwrap()
    }

    #[tokio::test]
    async fn start_creates_game_and_awaits_input() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        assert!(controller.start().await.unwrap());
        assert_eq!(controller.state(), SessionState::AwaitingInput);
        assert_eq!(controller.game_id(), Some("abc123"));

        let out = output(controller);
        assert!(out.starts_with("Welcome to Mastermind!\n"));
        assert!(out.contains("Type 'exit' to quit.\n\n"));
        assert!(out.ends_with("New game started. Enter your guess:\n"));
    }

    #[tokio::test]
    async fn failed_creation_stays_without_session() {
        let api = FakeApi::failing_create(ApiError::Transport("connection refused".into()));
        let mut controller = Controller::new(api, Vec::new());
        assert!(!controller.start().await.unwrap());
        assert_eq!(controller.state(), SessionState::NoSession);
        assert_eq!(controller.game_id(), None);
        assert!(output(controller).contains("Error starting game: connection refused\n"));
    }

    #[tokio::test]
    async fn exit_without_session_makes_no_request() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        let flow = controller.handle_line("exit").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Exited));
        assert_eq!(controller.state(), SessionState::Terminated);
        assert!(controller.api().requests().is_empty());
        assert_eq!(output(controller), "Goodbye!\n");
    }

    #[tokio::test]
    async fn exit_is_case_insensitive_and_trimmed() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        controller.start().await.unwrap();
        let flow = controller.handle_line("  ExIt \n").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Exited));
        assert_eq!(
            controller.api().requests(),
            vec![Request::Create, Request::Delete("abc123".into())]
        );
        assert!(output(controller).ends_with("Game ended. Goodbye!\n"));
    }

    #[tokio::test]
    async fn exit_completes_even_if_delete_fails() {
        let mut api = FakeApi::new("abc123");
        api.delete = Err(ApiError::Transport("timed out".into()));
        let mut controller = Controller::new(api, Vec::new());
        controller.start().await.unwrap();
        let flow = controller.handle_line("exit").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Exited));
        assert_eq!(controller.state(), SessionState::Terminated);
        assert!(output(controller).ends_with("Game ended. Goodbye!\n"));
    }

    #[tokio::test]
    async fn validation_failures_reprompt_without_requests() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        controller.start().await.unwrap();

        for line in ["123", "12345", "", "12a4", "7777", "1 34"] {
            let flow = controller.handle_line(line).await.unwrap();
            assert_eq!(flow, Flow::Continue);
            assert_eq!(controller.state(), SessionState::AwaitingInput);
            assert_eq!(controller.game_id(), Some("abc123"));
        }
        assert_eq!(controller.api().requests(), vec![Request::Create]);

        let out = output(controller);
        assert_eq!(out.matches("Guess must be 4 digits long\n").count(), 3);
        assert_eq!(out.matches("Each digit must be between 1 and 6\n").count(), 3);
    }

    #[tokio::test]
    async fn valid_guess_without_session_is_not_sent() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        let flow = controller.handle_line("1234").await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(controller.state(), SessionState::NoSession);
        assert!(controller.api().requests().is_empty());
        assert_eq!(output(controller), "No active game. Please start a new game.\n");
    }

    #[tokio::test]
    async fn feedback_is_rendered_and_loop_continues() {
        let api = FakeApi::new("abc123").reply(feedback(2, 1));
        let mut controller = Controller::new(api, Vec::new());
        controller.start().await.unwrap();

        let flow = controller.handle_line(" 1123 ").await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(controller.state(), SessionState::AwaitingInput);
        assert_eq!(
            controller.api().requests()[1],
            Request::Guess("abc123".into(), "1123".into())
        );
        assert!(output(controller).ends_with("Feedback: BBW\n"));
    }

    #[tokio::test]
    async fn win_deletes_game_regardless_of_white() {
        let api = FakeApi::new("abc123").reply(feedback(4, 1));
        let mut controller = Controller::new(api, Vec::new());
        controller.start().await.unwrap();

        let flow = controller.handle_line("1234").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Won));
        assert_eq!(controller.state(), SessionState::Terminated);
        assert_eq!(controller.game_id(), None);
        assert_eq!(
            controller.api().requests().last(),
            Some(&Request::Delete("abc123".into()))
        );

        let out = output(controller);
        assert!(out.ends_with("Feedback: BBBBW\nCongratulations! You guessed the code!\n"));
    }

    #[tokio::test]
    async fn win_completes_even_if_delete_fails() {
        let mut api = FakeApi::new("abc123").reply(feedback(4, 0));
        api.delete = Err(ApiError::Transport("connection reset".into()));
        let mut controller = Controller::new(api, Vec::new());
        controller.start().await.unwrap();

        let flow = controller.handle_line("1234").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Won));
        assert_eq!(controller.state(), SessionState::Terminated);
        assert_eq!(
            controller.api().requests().last(),
            Some(&Request::Delete("abc123".into()))
        );
        assert!(output(controller).ends_with("Congratulations! You guessed the code!\n"));
    }

    #[tokio::test]
    async fn win_deletes_game_when_output_is_broken() {
        let api = FakeApi::new("abc123").reply(feedback(4, 0));
        let mut controller = in_session(api, BrokenPipe);

        let flow = controller.handle_line("1234").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Won));
        assert_eq!(controller.state(), SessionState::Terminated);
        assert_eq!(
            controller.api().requests(),
            vec![
                Request::Guess("abc123".into(), "1234".into()),
                Request::Delete("abc123".into()),
            ]
        );
    }

    #[tokio::test]
    async fn exit_deletes_game_when_output_is_broken() {
        let mut controller = in_session(FakeApi::new("abc123"), BrokenPipe);

        let flow = controller.handle_line("exit").await.unwrap();
        assert_eq!(flow, Flow::Finished(Outcome::Exited));
        assert_eq!(controller.api().requests(), vec![Request::Delete("abc123".into())]);
    }

    #[tokio::test]
    async fn broken_output_mid_game_is_an_error() {
        let api = FakeApi::new("abc123").reply(feedback(1, 0));
        let mut controller = in_session(api, BrokenPipe);

        let err = controller.handle_line("1234").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(controller.game_id(), Some("abc123"));
    }

    #[tokio::test]
    async fn api_errors_are_reported_and_recovered() {
        let api = FakeApi::new("abc123")
            .reply(Err(ApiError::InvalidResponse))
            .reply(Err(ApiError::Server("game not found".into())))
            .reply(feedback(0, 0));
        let mut controller = Controller::new(api, Vec::new());
        controller.start().await.unwrap();

        for _ in 0..3 {
            assert_eq!(controller.handle_line("6543").await.unwrap(), Flow::Continue);
            assert_eq!(controller.state(), SessionState::AwaitingInput);
        }

        let out = output(controller);
        assert!(out.contains("Error submitting guess: Invalid server response\n"));
        assert!(out.contains("Error submitting guess: game not found\n"));
        assert!(out.ends_with("Feedback: \n"));
    }

    #[tokio::test]
    async fn run_plays_until_win() {
        let api = FakeApi::new("abc123").reply(feedback(1, 2)).reply(feedback(4, 0));
        let mut controller = Controller::new(api, Vec::new());
        let input: &[u8] = b"12\n1234\n4321\n1111\n";

        let outcome = controller.run(input).await.unwrap();
        assert_eq!(outcome, Outcome::Won);
        assert_eq!(
            controller.api().requests(),
            vec![
                Request::Create,
                Request::Guess("abc123".into(), "1234".into()),
                Request::Guess("abc123".into(), "4321".into()),
                Request::Delete("abc123".into()),
            ]
        );

        let out = output(controller);
        assert_eq!(out.matches(PROMPT).count(), 3);
        assert!(!out.contains("1111"));
    }

    #[tokio::test]
    async fn run_treats_end_of_input_as_exit() {
        let mut controller = Controller::new(FakeApi::new("abc123"), Vec::new());
        let input: &[u8] = b"";
        let outcome = controller.run(input).await.unwrap();
        assert_eq!(outcome, Outcome::Exited);
        assert_eq!(
            controller.api().requests(),
            vec![Request::Create, Request::Delete("abc123".into())]
        );
        assert!(output(controller).ends_with("> Game ended. Goodbye!\n"));
    }

    #[tokio::test]
    async fn run_stops_after_failed_creation() {
        let api = FakeApi::failing_create(ApiError::NoData);
        let mut controller = Controller::new(api, Vec::new());
        let outcome = controller.run(&b"1234\nexit\n"[..]).await.unwrap();
        assert_eq!(outcome, Outcome::CreationFailed);
        assert_eq!(controller.api().requests(), vec![Request::Create]);

        let out = output(controller);
        assert!(out.ends_with("Error starting game: No data received\n"));
        assert!(!out.contains(PROMPT));
    }
}
