//! UNO setup, actions and the game loop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::card::{standard_deck, Color, UnoCard, UnoTable};
use super::{UnoSeat, DECK_SEAT};
use crate::cards::{Card, Playable};
use crate::core::config::EngineConfig;
use crate::core::entity::CardUid;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::decision::{DecisionSource, Query};
use crate::rules::{GameEnvironment, GameResult, Participant, TurnChange};
use crate::zones::{transfer, PilePosition};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnoConfig {
    pub players: u8,
    pub hand_size: usize,
    pub seed: u64,
    pub engine: EngineConfig,
}

impl Default for UnoConfig {
    fn default() -> Self {
        Self { players: 4, hand_size: 3, seed: 0, engine: EngineConfig::default() }
    }
}

impl UnoConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_players(mut self, players: u8) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

/// The only question UNO asks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UnoQuery {
    ChooseAction,
}

/// A move, in the text form `ff`, `pick_deck`, `play_card_<n>` or
/// `colorswap_<color>_card_<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnoAction {
    Forfeit,
    PickDeck,
    Play(CardUid),
    /// Play a wild card and name the color.
    ColorSwap(Color, CardUid),
}

impl fmt::Display for UnoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnoAction::Forfeit => write!(f, "ff"),
            UnoAction::PickDeck => write!(f, "pick_deck"),
            UnoAction::Play(uid) => write!(f, "play_{uid}"),
            UnoAction::ColorSwap(color, uid) => write!(f, "colorswap_{color}_{uid}"),
        }
    }
}

impl FromStr for UnoAction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let unknown = || EngineError::invalid(format!("`{s}` is not an uno action"));
        match s {
            "ff" => return Ok(UnoAction::Forfeit),
            "pick_deck" => return Ok(UnoAction::PickDeck),
            _ => {}
        }
        if let Some(rest) = s.strip_prefix("colorswap_") {
            let (color, uid) = rest.split_once('_').ok_or_else(unknown)?;
            let color = color.parse::<Color>().map_err(|_| unknown())?;
            let uid = uid.parse::<CardUid>().map_err(|_| unknown())?;
            return Ok(UnoAction::ColorSwap(color, uid));
        }
        if let Some(uid) = s.strip_prefix("play_") {
            return uid.parse::<CardUid>().map(UnoAction::Play).map_err(|_| unknown());
        }
        Err(unknown())
    }
}

pub struct UnoGame {
    env: GameEnvironment<UnoSeat>,
    top: Option<UnoCard>,
    config: UnoConfig,
    turns: usize,
}

impl UnoGame {
    /// Shuffle the standard deck, flip the first card, deal every player a
    /// hand and set a random turn order.
    pub fn new(config: UnoConfig) -> Result<Self> {
        Self::with_deck(config, standard_deck())
    }

    /// Like [`UnoGame::new`] with a custom deck.
    pub fn with_deck(config: UnoConfig, cards: Vec<UnoCard>) -> Result<Self> {
        if config.players < 2 {
            return Err(EngineError::InvalidOrder(format!("uno needs at least 2 players, got {}", config.players)));
        }
        let mut env = GameEnvironment::new(config.seed);
        env.register(UnoSeat::deck())?;
        let mut order: Vec<PlayerId> = Vec::with_capacity(usize::from(config.players));
        for id in PlayerId::all(usize::from(config.players)) {
            order.push(env.register(UnoSeat::player(id))?);
        }

        {
            let (deck, uids, rng) = env.seat_with_tools(DECK_SEAT)?;
            for card in cards {
                deck.pile.register_new(card, uids, PilePosition::Back)?;
            }
            deck.pile.shuffle(rng);
        }

        let mut game = Self { env, top: None, config, turns: 0 };
        game.flip_top()?;
        for &id in &order {
            game.deal(id, game.config.hand_size)?;
        }

        game.env.rng().shuffle(&mut order);
        game.env.establish_order(order)?;
        info!(target: "engine::uno", players = game.config.players, "uno game set up");
        Ok(game)
    }

    #[must_use]
    pub fn env(&self) -> &GameEnvironment<UnoSeat> {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut GameEnvironment<UnoSeat> {
        &mut self.env
    }

    #[must_use]
    pub fn top(&self) -> Option<&UnoCard> {
        self.top.as_ref()
    }

    pub fn hand(&self, id: PlayerId) -> Result<&crate::zones::Cardholder<UnoCard>> {
        Ok(&self.env.get(id)?.pile)
    }

    pub fn deck_len(&self) -> Result<usize> {
        Ok(self.env.get(DECK_SEAT)?.pile.len())
    }

    #[must_use]
    pub fn turns(&self) -> usize {
        self.turns
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.env.result()
    }

    /// Move the front card of the deck onto the top of the pile. The card it
    /// covers goes to the back of the deck.
    fn flip_top(&mut self) -> Result<()> {
        let deck = &mut self.env.get_mut(DECK_SEAT)?.pile;
        let (uid, _) = deck.peek()?;
        let card = deck.remove(uid)?;
        if let Some(mut old) = self.top.replace(card) {
            old.clear_choice();
            deck.register(old, None, PilePosition::Back)?;
        }
        Ok(())
    }

    /// Up to `count` cards from the deck into `id`'s hand.
    fn deal(&mut self, id: PlayerId, count: usize) -> Result<usize> {
        let (deck, seat) = self.env.pair_mut(DECK_SEAT, id)?;
        let mut dealt = 0;
        while dealt < count {
            let Some(uid) = deck.pile.front() else {
                break;
            };
            transfer(uid, &mut deck.pile, &mut seat.pile, PilePosition::Back)?;
            dealt += 1;
        }
        Ok(dealt)
    }

    /// Every move `id` may make right now.
    pub fn available_actions(&self, id: PlayerId) -> Result<Vec<UnoAction>> {
        let top = self.top.as_ref().ok_or_else(|| EngineError::invalid("no card on top of the pile"))?;
        let mut actions = vec![UnoAction::Forfeit];
        if !self.env.get(DECK_SEAT)?.pile.is_empty() {
            actions.push(UnoAction::PickDeck);
        }
        for (uid, card) in self.env.get(id)?.pile.iter() {
            if card.is_wild() {
                actions.extend(Color::iter().map(|color| UnoAction::ColorSwap(color, uid)));
            } else if card.matches(top) {
                actions.push(UnoAction::Play(uid));
            }
        }
        Ok(actions)
    }

    /// Perform `action` for the player whose turn it is.
    ///
    /// `Ok(false)` means the move is not legal and nothing changed.
    pub fn apply(&mut self, id: PlayerId, action: UnoAction) -> Result<bool> {
        if self.env.current() != Some(id) {
            return Err(EngineError::invalid(format!("it is not {id}'s turn")));
        }
        debug!(target: "engine::uno", player = %id, %action, "action");
        match action {
            UnoAction::Forfeit => {
                self.env.deactivate(id)?;
                Ok(true)
            }
            UnoAction::PickDeck => Ok(self.deal(id, 1)? == 1),
            UnoAction::Play(uid) => {
                let playable = match (self.env.get(id)?.pile.get(uid), self.top.as_ref()) {
                    (Some(card), Some(top)) => !card.is_wild() && card.matches(top),
                    _ => false,
                };
                if !playable {
                    return Ok(false);
                }
                self.play(id, uid, None)
            }
            UnoAction::ColorSwap(color, uid) => {
                if !self.env.get(id)?.pile.get(uid).is_some_and(UnoCard::is_wild) {
                    return Ok(false);
                }
                self.play(id, uid, Some(color))
            }
        }
    }

    fn play(&mut self, id: PlayerId, uid: CardUid, color: Option<Color>) -> Result<bool> {
        let hand = &mut self.env.get_mut(id)?.pile;
        let slot = PilePosition::At(hand.position(uid).unwrap_or(hand.len()));
        let mut card = hand.remove(uid)?;
        match card.play_card(color, &mut UnoTable { env: &mut self.env, player: id }) {
            Ok(true) => {}
            outcome => {
                card.clear_choice();
                self.env.get_mut(id)?.pile.register(card, None, slot)?;
                return outcome;
            }
        }

        info!(target: "engine::uno", player = %id, card = %card.label(), "card played");
        if let Some(mut old) = self.top.replace(card) {
            old.clear_choice();
            self.env.get_mut(DECK_SEAT)?.pile.register(old, None, PilePosition::Back)?;
        }
        if self.env.get(id)?.pile.is_empty() {
            self.env.declare_winner(id);
        }
        Ok(true)
    }

    /// Return every card to the deck, reshuffle and flip a new top card.
    pub fn reset_deck(&mut self) -> Result<()> {
        let seats: Vec<PlayerId> = self.env.participants().map(|seat| seat.id()).collect();
        let mut returned = Vec::new();
        for id in seats.into_iter().filter(|&id| id != DECK_SEAT) {
            returned.extend(self.env.get_mut(id)?.pile.drain());
        }
        if let Some(mut top) = self.top.take() {
            top.clear_choice();
            returned.push(top);
        }

        let (deck, _, rng) = self.env.seat_with_tools(DECK_SEAT)?;
        for card in returned {
            deck.pile.register(card, None, PilePosition::Back)?;
        }
        deck.pile.shuffle(rng);
        self.flip_top()?;
        self.env.clear_winner();
        info!(target: "engine::uno", "deck reset");
        Ok(())
    }

    /// Ask `id` for a move until a legal one is played, up to
    /// `max_prompt_retries` times. A player who never answers legally draws
    /// a card instead.
    pub fn take_turn(&mut self, id: PlayerId, decisions: &mut dyn DecisionSource<UnoQuery>) -> Result<()> {
        for _ in 0..self.config.engine.max_prompt_retries {
            let options = self.available_actions(id)?.iter().map(ToString::to_string).collect();
            let query = Query::new(UnoQuery::ChooseAction, options);
            let Some(answer) = decisions.query(id, &query) else {
                decisions.notify(id, "An action is required");
                continue;
            };
            let action = match answer.join(" ").parse::<UnoAction>() {
                Ok(action) => action,
                Err(err) => {
                    decisions.notify(id, &err.to_string());
                    continue;
                }
            };
            if self.apply(id, action)? {
                return Ok(());
            }
            decisions.notify(id, &format!("`{action}` cannot be played now"));
        }
        warn!(target: "engine::uno", player = %id, "no legal answer, drawing a card");
        self.deal(id, 1)?;
        Ok(())
    }

    /// Play until someone empties their hand, everyone else forfeits, or
    /// `max_turns` passes (a draw).
    pub fn run(&mut self, decisions: &mut dyn DecisionSource<UnoQuery>) -> Result<GameResult> {
        loop {
            if let Some(result) = self.env.result() {
                info!(target: "engine::uno", ?result, turns = self.turns, "game over");
                return Ok(result);
            }
            if self.turns >= self.config.engine.max_turns {
                warn!(target: "engine::uno", turns = self.turns, "turn limit reached, declaring a draw");
                return Ok(GameResult::Draw);
            }
            let current = self.env.current().ok_or(EngineError::OrderNotEstablished)?;
            self.turns += 1;
            self.take_turn(current, decisions)?;

            if let TurnChange::Finished(result) = self.env.next_turn()? {
                info!(target: "engine::uno", ?result, turns = self.turns, "game over");
                return Ok(result);
            }
        }
    }
}
