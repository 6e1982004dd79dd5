//! The two-player battler: setup, turn loop and knock-out sweeps.
//!
//! Every executed phase is followed by two sweeps over both players:
//! flagged cards get their `cleanup` run, then knocked-out characters are
//! discarded and may end the game.

use tracing::{debug, info, warn};

use super::card::{declares, BattleCard};
use super::config::BattleConfig;
use super::player::{BattlePlayer, Stadium, TurnContext};
use super::types::{piles, ActionKind, BattleQuery, Capabilities, IN_PLAY};
use crate::cards::Card;
use crate::core::config::ZoneId;
use crate::core::entity::CardUid;
use crate::core::error::{EngineError, Result};
use crate::core::player::PlayerId;
use crate::decision::{DecisionSource, Query};
use crate::flow::TurnSignal;
use crate::rules::{GameEnvironment, GameResult, TurnChange};
use crate::zones::PilePosition;

pub struct BattleGame<D> {
    env: GameEnvironment<BattlePlayer>,
    stadium: Option<Stadium>,
    config: BattleConfig,
    decisions: D,
    turns: usize,
}

impl<D: DecisionSource<BattleQuery>> BattleGame<D> {
    /// Seat players 0 and 1 and flip a coin for who goes first.
    pub fn new(config: BattleConfig, decisions: D) -> Result<Self> {
        let mut env = GameEnvironment::new(config.seed);
        let (first, second) = (PlayerId::new(0), PlayerId::new(1));
        env.register(BattlePlayer::new(first, second, &config)?)?;
        env.register(BattlePlayer::new(second, first, &config)?)?;

        let order = if env.rng().coin_flip() { vec![first, second] } else { vec![second, first] };
        env.establish_order(order)?;

        Ok(Self { env, stadium: None, config, decisions, turns: 0 })
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn env(&self) -> &GameEnvironment<BattlePlayer> {
        &self.env
    }

    pub fn player(&self, id: PlayerId) -> Result<&BattlePlayer> {
        self.env.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut BattlePlayer> {
        self.env.get_mut(id)
    }

    #[must_use]
    pub fn stadium(&self) -> Option<&Stadium> {
        self.stadium.as_ref()
    }

    #[must_use]
    pub fn decisions(&self) -> &D {
        &self.decisions
    }

    pub fn decisions_mut(&mut self) -> &mut D {
        &mut self.decisions
    }

    /// Turns started so far.
    #[must_use]
    pub fn turns(&self) -> usize {
        self.turns
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.env.result()
    }

    /// Validate and shuffle a deck, draw an opening hand and promote an
    /// active character.
    ///
    /// A hand without characters goes back into the deck and the draw is
    /// repeated, up to `max_mulligans` times.
    pub fn initialize_player(&mut self, id: PlayerId, deck: Vec<BattleCard>) -> Result<()> {
        if deck.len() != self.config.cards_per_deck {
            return Err(EngineError::DeckSize { expected: self.config.cards_per_deck, actual: deck.len() });
        }
        for card in &deck {
            card.check()?;
        }

        let hand_size = self.config.initial_hand_size;
        let max_mulligans = self.config.engine.max_mulligans;
        {
            let (player, uids, rng) = self.env.seat_with_tools(id)?;
            let pile = player.board.piles.get_mut(piles::DECK)?;
            for card in deck {
                pile.register_new(card, uids, PilePosition::Back)?;
            }
            pile.shuffle(rng);

            let mut attempts = 0;
            loop {
                player.board.draw(hand_size)?;
                if !player.board.hand_uids(BattleCard::is_character).is_empty() {
                    break;
                }
                attempts += 1;
                if attempts >= max_mulligans {
                    return Err(EngineError::MulliganExhausted { player: id, attempts });
                }
                let (hand, deck) = player.board.piles.pair_mut(piles::HAND, piles::DECK)?;
                for card in hand.drain() {
                    deck.register(card, None, PilePosition::Back)?;
                }
                deck.shuffle(rng);
                debug!(target: "engine::setup", player = %id, attempts, "mulligan");
            }
            player.board.counters.tokens = self.config.initial_tokens;
        }

        if !self.prompt_active(id)? {
            return Err(EngineError::declined(BattleQuery::MakeActive));
        }
        info!(target: "engine::setup", player = %id, "player initialized");
        Ok(())
    }

    /// Move a character from hand or bench into the empty Active pile.
    ///
    /// A character arriving from the hand has its passive played.
    pub fn make_active(&mut self, id: PlayerId, uid: CardUid) -> Result<bool> {
        let opponent_id = self.env.get(id)?.opponent();
        let (player, opponent) = self.env.pair_mut(id, opponent_id)?;
        if player.board.active_uid().is_some() {
            return Err(EngineError::invalid(format!("{id} already has an active character")));
        }

        let from = [piles::HAND, piles::BENCH].into_iter().find(|&zone| {
            player
                .board
                .pile(zone)
                .ok()
                .and_then(|pile| pile.get(uid))
                .is_some_and(BattleCard::is_character)
        });
        let Some(from) = from else {
            return Err(EngineError::invalid(format!("{uid} is not a character in hand or on the bench")));
        };

        player.board.piles.transfer(uid, from, piles::ACTIVE, PilePosition::Back)?;
        let has_passive = player
            .board
            .pile(piles::ACTIVE)?
            .get(uid)
            .is_some_and(|card| declares(card, Capabilities::PASSIVE));
        if from == piles::HAND && has_passive {
            player.use_ability(uid, piles::ACTIVE, ActionKind::Passive, opponent.board.active_core_mut(), &self.config)?;
        }
        info!(target: "engine::flow", player = %id, %uid, "character made active");
        Ok(true)
    }

    /// Ask `id` for a new active character until one is promoted or the
    /// retries run out. `Ok(false)` when nothing could be promoted.
    fn prompt_active(&mut self, id: PlayerId) -> Result<bool> {
        for _ in 0..self.config.engine.max_prompt_retries {
            let board = &self.env.get(id)?.board;
            let mut candidates = board.hand_uids(BattleCard::is_character);
            candidates.extend(board.character_uids(&[piles::BENCH]));
            if candidates.is_empty() {
                return Ok(false);
            }

            let query = Query::new(BattleQuery::MakeActive, candidates.iter().map(ToString::to_string).collect());
            let Some(answer) = self.decisions.query(id, &query) else {
                self.decisions.notify(id, "An active character is required");
                continue;
            };
            let Some(word) = answer.iter().flat_map(|part| part.split_whitespace()).next() else {
                self.decisions.notify(id, "An active character is required");
                continue;
            };

            let promoted = word
                .parse::<CardUid>()
                .map_err(|err| EngineError::invalid(err.to_string()))
                .and_then(|uid| self.make_active(id, uid));
            match promoted {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(err) if err.is_recoverable() => self.decisions.notify(id, &err.to_string()),
                Err(err) => return Err(err),
            }
        }
        Ok(false)
    }

    /// Run `cleanup` on every in-play character flagged since the last sweep.
    pub fn check_cleanups(&mut self) -> Result<()> {
        for id in self.env.order().to_vec() {
            let board = &mut self.env.get_mut(id)?.board;
            for uid in board.character_uids(&IN_PLAY) {
                let Some(character) = board.character_mut(uid, &IN_PLAY) else {
                    continue;
                };
                if !character.core().vitals.cleanup_flag {
                    continue;
                }
                character.core_mut().vitals.cleanup_flag = false;
                if !character.cleanup(uid) {
                    return Err(EngineError::CleanupFailed(uid));
                }
                debug!(target: "engine::flow", player = %id, %uid, "cleanup ran");
            }
        }
        Ok(())
    }

    /// Discard every knocked-out character and credit the opponent.
    ///
    /// Returns `true` when the sweep ended the game: the opponent reached
    /// `kos_to_win`, or a player lost its active character and could not
    /// replace it.
    pub fn check_hp(&mut self) -> Result<bool> {
        for id in self.env.order().to_vec() {
            let player = self.env.get_mut(id)?;
            let mut knocked: Vec<(CardUid, ZoneId)> = Vec::new();
            for zone in IN_PLAY {
                for (uid, card) in player.board.pile(zone)?.iter() {
                    if card.as_character().is_some_and(|c| c.core().vitals.is_knocked_out()) {
                        knocked.push((uid, zone));
                    }
                }
            }
            if knocked.is_empty() {
                continue;
            }

            let mut lost_active = false;
            for &(uid, zone) in &knocked {
                if let Some(character) = player.board.character_mut(uid, &[zone]) {
                    character.core_mut().vitals.cleanup_flag = false;
                    if !character.cleanup(uid) {
                        return Err(EngineError::CleanupFailed(uid));
                    }
                }
                if player.flow_hooks.owns_any(uid) {
                    player.flow_hooks.purify(uid, None)?;
                }
                player.board.piles.transfer(uid, zone, piles::DISCARD, PilePosition::Back)?;
                lost_active |= zone == piles::ACTIVE;
                info!(target: "engine::flow", player = %id, %uid, "character knocked out");
            }

            let opponent_id = player.opponent();
            let counters = &mut self.env.get_mut(opponent_id)?.board.counters;
            counters.kos += knocked.len() as u32;
            if counters.kos >= self.config.kos_to_win {
                info!(target: "engine::flow", winner = %opponent_id, kos = counters.kos, "knock-out limit reached");
                self.concede(id)?;
                return Ok(true);
            }
            if lost_active && !self.prompt_active(id)? {
                info!(target: "engine::flow", player = %id, "no character left to make active");
                self.concede(id)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn concede(&mut self, id: PlayerId) -> Result<()> {
        self.env.get_mut(id)?.mark_lost();
        if self.env.is_active(id)? {
            self.env.deactivate(id)?;
        }
        Ok(())
    }

    /// Pop and execute one phase of `id`'s flow, then sweep.
    ///
    /// `Ok(None)` when the flow stack was already empty.
    pub fn step(&mut self, id: PlayerId) -> Result<Option<TurnSignal>> {
        let opponent_id = self.env.get(id)?.opponent();
        let signal = {
            let (player, opponent) = self.env.pair_mut(id, opponent_id)?;
            let Some(phase) = player.flow_mut().pop() else {
                return Ok(None);
            };
            let mut ctx = TurnContext {
                opponent,
                stadium: &mut self.stadium,
                decisions: &mut self.decisions,
                config: &self.config,
            };
            player.action(phase, &mut ctx)?
        };

        self.check_cleanups()?;
        if self.check_hp()? {
            return Ok(Some(TurnSignal::EndTurn));
        }
        Ok(Some(signal))
    }

    /// Play one full turn for `id`.
    pub fn play_turn(&mut self, id: PlayerId) -> Result<()> {
        self.env.get_mut(id)?.turn_reset();
        info!(target: "engine::flow", player = %id, turn = self.turns, "turn started");

        let max_steps = self.config.engine.max_steps_per_turn;
        for _ in 0..max_steps {
            match self.step(id)? {
                None | Some(TurnSignal::EndTurn) => return Ok(()),
                Some(TurnSignal::Continue) if self.env.result().is_some() => return Ok(()),
                Some(TurnSignal::Continue) => {}
            }
        }
        warn!(target: "engine::flow", player = %id, max_steps, "step limit reached, ending turn");
        Ok(())
    }

    /// Play turns until the game is decided or `max_turns` is reached; the
    /// latter is a draw.
    pub fn run(&mut self) -> Result<GameResult> {
        loop {
            if let Some(result) = self.env.result() {
                info!(target: "engine::flow", ?result, turns = self.turns, "game over");
                return Ok(result);
            }
            if self.turns >= self.config.engine.max_turns {
                warn!(target: "engine::flow", turns = self.turns, "turn limit reached, declaring a draw");
                return Ok(GameResult::Draw);
            }

            let current = self.env.current().ok_or(EngineError::OrderNotEstablished)?;
            self.turns += 1;
            self.play_turn(current)?;

            if let TurnChange::Finished(result) = self.env.next_turn()? {
                info!(target: "engine::flow", ?result, turns = self.turns, "game over");
                return Ok(result);
            }
        }
    }
}
