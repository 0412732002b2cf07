//! Game driver
//!
//! Owns a session and a leaderboard store. Each `update` runs one simulation
//! tick, then performs at most one pending leaderboard step, so the write, the
//! read and the first view land on successive updates.

use crate::leaderboard::{Leaderboard, RankedEntry};
use crate::persistence::LeaderboardStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameSession, LeaderboardStage, LevelError, TickInput, tick};

/// A running game wired to its leaderboard store
pub struct Game<S: LeaderboardStore> {
    session: GameSession,
    store: S,
    board: Leaderboard,
    rows: usize,
}

impl<S: LeaderboardStore> Game<S> {
    pub fn new(settings: &Settings, store: S) -> Result<Self, LevelError> {
        Ok(Self {
            session: GameSession::new(settings.sim_config())?,
            store,
            board: Leaderboard::default(),
            rows: settings.leaderboard_rows,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The board as last read from the store
    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    /// Run one tick and any leaderboard I/O it unlocked
    pub fn update(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = tick(&mut self.session, input);
        if events.contains(&GameEvent::SessionRestarted) {
            self.board = Leaderboard::default();
        }
        self.drive_leaderboard(&mut events);
        events
    }

    fn drive_leaderboard(&mut self, events: &mut Vec<GameEvent>) {
        match self.session.leaderboard {
            Some(LeaderboardStage::WritePending) => {
                let entry = self.session.result_entry();
                if let Err(e) = self.store.append(&entry) {
                    log::error!("Could not save score: {}", e);
                }
                self.session.leaderboard = Some(LeaderboardStage::ReadPending);
            }
            Some(LeaderboardStage::ReadPending) => {
                self.board = Leaderboard::load(&self.store).unwrap_or_else(|e| {
                    log::error!("Could not read leaderboard: {}. Showing an empty board.", e);
                    Leaderboard::default()
                });
                self.session.leaderboard = Some(LeaderboardStage::ShowingAll);
                events.push(GameEvent::LeaderboardToggled(LeaderboardStage::ShowingAll));
            }
            _ => {}
        }
    }

    /// Rows for the view on screen (None until the board has been read)
    pub fn view(&self) -> Option<Vec<RankedEntry>> {
        match self.session.leaderboard? {
            LeaderboardStage::ShowingAll => Some(self.board.top(self.rows)),
            LeaderboardStage::ShowingMine => {
                Some(self.board.for_player(&self.session.name, self.rows))
            }
            LeaderboardStage::WritePending | LeaderboardStage::ReadPending => None,
        }
    }

    /// This player's best global rank on the board
    pub fn best_rank(&self) -> Option<usize> {
        self.board.best_rank(&self.session.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LeaderboardEntry;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::sim::{GamePhase, Key};
    use crate::consts::MAX_DEATHS;

    struct FailingStore;

    impl LeaderboardStore for FailingStore {
        fn append(&mut self, _entry: &LeaderboardEntry) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "unavailable".to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn load_all(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
            Err(StoreError::Io {
                path: "unavailable".to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }
    }

    fn start<S: LeaderboardStore>(game: &mut Game<S>, name: &str) {
        game.update(&TickInput::typed(name));
        game.update(&TickInput::press(&[Key::Enter]));
        assert!(matches!(game.session().phase, GamePhase::Level(_)));
    }

    #[test]
    fn test_loss_writes_then_reads_then_shows() {
        let mut store = MemoryStore::default();
        store
            .append(&LeaderboardEntry::new("ZED".to_string(), 2000))
            .unwrap();
        let mut game = Game::new(&Settings::default(), store).unwrap();
        start(&mut game, "ann");
        game.session.score = 400;
        game.session.deaths = MAX_DEATHS;

        let events = game.update(&TickInput::default());
        assert_eq!(game.session().phase, GamePhase::Lost);
        assert!(events.contains(&GameEvent::SubmitScore(LeaderboardEntry::new(
            "ANN".to_string(),
            400
        ))));
        assert_eq!(game.session().leaderboard, Some(LeaderboardStage::ReadPending));
        assert_eq!(game.store().load_all().unwrap().len(), 2);
        assert!(game.view().is_none());

        let events = game.update(&TickInput::default());
        assert_eq!(
            events,
            vec![GameEvent::LeaderboardToggled(LeaderboardStage::ShowingAll)]
        );
        let rows = game.view().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "ZED");
        assert_eq!(game.best_rank(), Some(2));

        game.update(&TickInput::press(&[Key::ToggleView]));
        let mine = game.view().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].rank, 2);

        // Further updates never write again
        for _ in 0..5 {
            game.update(&TickInput::default());
        }
        assert_eq!(game.store().load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_restart_clears_board() {
        let mut game = Game::new(&Settings::default(), MemoryStore::default()).unwrap();
        start(&mut game, "bo");
        game.session.deaths = MAX_DEATHS;
        game.update(&TickInput::default());
        game.update(&TickInput::default());
        assert_eq!(game.board().len(), 1);

        let events = game.update(&TickInput::press(&[Key::Enter]));
        assert!(events.contains(&GameEvent::SessionRestarted));
        assert_eq!(game.session().phase, GamePhase::EnteringName);
        assert!(game.board().is_empty());
        assert!(game.view().is_none());
        // The written row survives the restart
        assert_eq!(game.store().load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_failing_store_degrades_to_empty_board() {
        let mut game = Game::new(&Settings::default(), FailingStore).unwrap();
        start(&mut game, "cy");
        game.session.deaths = MAX_DEATHS;

        game.update(&TickInput::default());
        assert_eq!(game.session().leaderboard, Some(LeaderboardStage::ReadPending));
        game.update(&TickInput::default());
        assert_eq!(game.session().leaderboard, Some(LeaderboardStage::ShowingAll));
        assert_eq!(game.view(), Some(Vec::new()));
    }

    #[test]
    fn test_rows_setting_caps_views() {
        let mut store = MemoryStore::default();
        for score in [100, 200, 300, 400] {
            store
                .append(&LeaderboardEntry::new("X".to_string(), score))
                .unwrap();
        }
        let settings = Settings {
            leaderboard_rows: 2,
            ..Default::default()
        };
        let mut game = Game::new(&settings, store).unwrap();
        start(&mut game, "x");
        game.session.deaths = MAX_DEATHS;
        game.update(&TickInput::default());
        game.update(&TickInput::default());

        let rows = game.view().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].score, 400);
    }
}
