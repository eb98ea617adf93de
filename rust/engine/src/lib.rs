//! # botanic-engine: Round Resolution Core
//!
//! The rules engine of a seed-planting board game. Players plant seeds on a
//! row of soil slots, apply upgrades to the soils, then play the hand: every
//! planted seed is harvested into score, seed effects fire (coins,
//! duplicates, retriggers), soil modifiers apply, and neighbour synergies add
//! bonuses. Resolution is replayed beat by beat through a poll-driven
//! scheduler before the round is won, redealt, or lost.
//!
//! Nothing here renders, plays sound, or reads input. Collaborators call in
//! and read results back.
//!
//! ## Core Modules
//!
//! - [`catalog`] - Seed and upgrade archetypes, instances, JSON catalogs
//! - [`soil`] - Soil slots and the board
//! - [`effects`] - Harvest value, synergy bonus, upgrade application
//! - [`round`] - Round manager: planting, playing hands, round transitions
//! - [`scheduler`] - Timed beat-by-beat replay of a hand
//! - [`player`] - Backpack interface and the default player inventory
//! - [`shop`] - Between-round shop
//! - [`rng`] - Injectable random sources (seeded ChaCha20, scripted)
//! - [`rules`] - Tunable rule numbers
//! - [`events`] - Cues and screen requests emitted by the engine
//! - [`logger`] - HarvestRecord and JSONL logging
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use botanic_engine::catalog::Catalog;
//! use botanic_engine::events::Screen;
//! use botanic_engine::player::Player;
//! use botanic_engine::rng::ChaChaSource;
//! use botanic_engine::round::{DropItem, RoundManager};
//! use botanic_engine::rules::RulesConfig;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let basic = catalog.mint_seed("Basic Seed").unwrap();
//! let player = Player::with_starting_kit(&basic, 10, vec![], 100);
//! let mut rm = RoundManager::new(RulesConfig::default(), player, ChaChaSource::new_with_seed(7));
//!
//! // plant the first seed of the hand on soil 0, then play
//! rm.handle_item_drop(DropItem::Seed(0), Some(0)).unwrap();
//! rm.play_hand(Duration::ZERO).unwrap();
//!
//! // poll once per frame until the round-won screen is requested
//! let mut now = Duration::ZERO;
//! let screen = loop {
//!     now += Duration::from_millis(16);
//!     if let Some(screen) = rm.update(now) {
//!         break screen;
//!     }
//! };
//! assert_eq!(screen, Screen::RoundWon);
//! assert_eq!(rm.last_record().unwrap().score_after, 10.0);
//! ```

pub mod catalog;
pub mod effects;
pub mod errors;
pub mod events;
pub mod game;
pub mod logger;
pub mod player;
pub mod rng;
pub mod round;
pub mod rules;
pub mod scheduler;
pub mod shop;
pub mod soil;
