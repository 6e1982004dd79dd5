//! A battler player and its turn-flow state machine.
//!
//! `BattlePlayer::action` executes one popped phase:
//!
//! 1. Check the phase's precondition. On failure, notify and fall back to
//!    `PhaseTwo`.
//! 2. Run every flow hook injected for the phase.
//! 3. Perform the phase's transition: push successors, move cards, query
//!    the player.
//!
//! Invalid or declined choices are absorbed here: the player is notified,
//! `PhaseTwo` is pushed, and no counter is spent.

use tracing::{debug, info, trace};

use super::card::{can_use, declares, BattleCard, TrainerContext};
use super::character::{AbilityContext, Character, CharacterCore, FlowHook};
use super::config::BattleConfig;
use super::types::{
    piles, ActionKind, AttackChoice, BattleQuery, Capabilities, Flow, Instrument, PhaseTwoChoice, TrainerKind,
    IN_PLAY,
};
use crate::cards::{Card, Playable};
use crate::core::config::ZoneId;
use crate::core::entity::CardUid;
use crate::core::error::{EngineError, ErrorKind, Result};
use crate::core::player::PlayerId;
use crate::decision::{DecisionSource, Query};
use crate::flow::{FlowStack, InjectionTable, TurnSignal};
use crate::rules::{ExitSignal, Participant};
use crate::zones::{Cardholder, PilePosition, PileSet};

/// Resources a player spends. The first three refill every turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub swaps: u32,
    pub supporters: u32,
    pub energy_attachments: u32,
    pub tokens: u32,
    /// Opposing characters this player has knocked out.
    pub kos: u32,
}

/// A player's piles and counters: everything a flow hook may touch.
#[derive(Debug)]
pub struct Board {
    pub piles: PileSet<BattleCard>,
    pub counters: Counters,
}

impl Board {
    pub fn new(owner: PlayerId, config: &BattleConfig) -> Result<Self> {
        Ok(Self {
            piles: PileSet::new(owner, &config.piles())?,
            counters: Counters::default(),
        })
    }

    pub fn pile(&self, zone: ZoneId) -> Result<&Cardholder<BattleCard>> {
        self.piles.get(zone)
    }

    #[must_use]
    pub fn active_uid(&self) -> Option<CardUid> {
        self.piles.get(piles::ACTIVE).ok()?.front()
    }

    pub fn active_core_mut(&mut self) -> Option<&mut CharacterCore> {
        let uid = self.active_uid()?;
        self.character_mut(uid, &[piles::ACTIVE]).map(|character| character.core_mut())
    }

    #[must_use]
    pub fn character(&self, uid: CardUid, zones: &[ZoneId]) -> Option<&dyn Character> {
        zones
            .iter()
            .filter_map(|&zone| self.piles.get(zone).ok())
            .find_map(|pile| pile.get(uid))
            .and_then(BattleCard::as_character)
    }

    pub fn character_mut(&mut self, uid: CardUid, zones: &[ZoneId]) -> Option<&mut (dyn Character + 'static)> {
        self.piles.find_mut(uid, zones)?.as_character_mut()
    }

    /// Ids of the characters in the given piles, in pile order.
    #[must_use]
    pub fn character_uids(&self, zones: &[ZoneId]) -> Vec<CardUid> {
        zones
            .iter()
            .filter_map(|&zone| self.piles.get(zone).ok())
            .flat_map(|pile| pile.iter())
            .filter(|(_, card)| card.is_character())
            .map(|(uid, _)| uid)
            .collect()
    }

    /// Ids of hand cards matching `filter`.
    pub fn hand_uids(&self, filter: impl Fn(&BattleCard) -> bool) -> Vec<CardUid> {
        self.piles
            .get(piles::HAND)
            .map(|hand| hand.iter().filter(|(_, card)| filter(card)).map(|(uid, _)| uid).collect())
            .unwrap_or_default()
    }

    /// Move up to `count` cards from the front of the deck into the hand.
    pub fn draw(&mut self, count: usize) -> Result<usize> {
        let mut drawn = 0;
        while drawn < count {
            let Some(uid) = self.piles.get(piles::DECK)?.front() else {
                break;
            };
            self.piles.transfer(uid, piles::DECK, piles::HAND, PilePosition::Back)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

/// The stadium in play and the player who owns it.
#[derive(Debug)]
pub struct Stadium {
    pub owner: PlayerId,
    pub card: BattleCard,
}

/// Everything outside the acting player that a phase may touch.
pub struct TurnContext<'a> {
    pub opponent: &'a mut BattlePlayer,
    pub stadium: &'a mut Option<Stadium>,
    pub decisions: &'a mut dyn DecisionSource<BattleQuery>,
    pub config: &'a BattleConfig,
}

pub struct BattlePlayer {
    id: PlayerId,
    opponent: PlayerId,
    pub board: Board,
    flow: FlowStack<Flow>,
    pub flow_hooks: InjectionTable<Flow, FlowHook>,
    has_lost: bool,
}

impl BattlePlayer {
    pub fn new(id: PlayerId, opponent: PlayerId, config: &BattleConfig) -> Result<Self> {
        Ok(Self {
            id,
            opponent,
            board: Board::new(id, config)?,
            flow: FlowStack::default(),
            flow_hooks: InjectionTable::new(),
            has_lost: false,
        })
    }

    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.opponent
    }

    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    pub fn mark_lost(&mut self) {
        self.has_lost = true;
    }

    #[must_use]
    pub fn flow(&self) -> &FlowStack<Flow> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut FlowStack<Flow> {
        &mut self.flow
    }

    /// Start-of-turn reset: flow back to `PreTurn`, per-turn counters refilled.
    pub fn turn_reset(&mut self) {
        self.flow.reset(Flow::PreTurn);
        let counters = &mut self.board.counters;
        counters.swaps = 1;
        counters.supporters = 1;
        counters.energy_attachments = 1;
    }

    /// Play one of a character's abilities against the opponent's active card.
    pub fn use_ability(
        &mut self,
        uid: CardUid,
        zone: ZoneId,
        action: ActionKind,
        opponent: Option<&mut CharacterCore>,
        config: &BattleConfig,
    ) -> Result<bool> {
        let Self { board, flow_hooks, .. } = self;
        let pile = board.piles.get_mut(zone)?;
        let holder = pile.id();
        let card = pile.get_mut(uid).ok_or(EngineError::CardNotFound { uid, holder })?;
        let mut ctx = AbilityContext { uid, flow_hooks, opponent, post_damage: config.post_damage };
        let played = card.play_card(action, &mut ctx)?;
        debug!(target: "engine::flow", player = %self.id, %uid, %action, played, "ability used");
        Ok(played)
    }

    /// Execute one phase.
    pub fn action(&mut self, phase: Flow, ctx: &mut TurnContext<'_>) -> Result<TurnSignal> {
        trace!(target: "engine::flow", player = %self.id, ?phase, "phase");

        if let Some(notice) = self.precondition(phase) {
            ctx.decisions.notify(self.id, notice);
            self.flow.push(Flow::PhaseTwo);
            return Ok(TurnSignal::Continue);
        }

        for (_, hook) in self.flow_hooks.hooks_mut(phase) {
            hook(&mut self.board);
        }

        match self.transition(phase, ctx) {
            Err(err) if err.is_recoverable() => {
                let notice = match err.kind() {
                    ErrorKind::Declined => format!("{err}. Resetting due to quit"),
                    _ => err.to_string(),
                };
                debug!(target: "engine::flow", player = %self.id, ?phase, %err, "phase aborted");
                ctx.decisions.notify(self.id, &notice);
                self.flow.push(Flow::PhaseTwo);
                Ok(TurnSignal::Continue)
            }
            other => other,
        }
    }

    fn precondition(&self, phase: Flow) -> Option<&'static str> {
        let counters = &self.board.counters;
        match phase {
            Flow::PrePlaySupporter if counters.supporters == 0 => Some("No supporters left this turn"),
            Flow::PreSwitch if counters.swaps == 0 => Some("No swaps left this turn"),
            Flow::PrePlayBench if self.board.pile(piles::BENCH).map_or(true, Cardholder::is_full) => {
                Some("Bench is full")
            }
            Flow::PreAttachNrg | Flow::PreAddNrgToken if counters.energy_attachments == 0 => {
                Some("No energy attachments left this turn")
            }
            _ => None,
        }
    }

    fn transition(&mut self, phase: Flow, ctx: &mut TurnContext<'_>) -> Result<TurnSignal> {
        let next = match phase {
            Flow::PreTurn => Some(Flow::PrePickCard),
            Flow::PrePickCard => Some(Flow::PickCard),
            Flow::PickCard => Some(self.pick_card()?),
            Flow::PostPickCard => Some(Flow::PrePhaseTwo),
            Flow::PrePhaseTwo => Some(Flow::PhaseTwo),
            Flow::PhaseTwo => Some(self.phase_two(ctx)?),
            Flow::PostPhaseTwo => Some(Flow::PreAttack),

            Flow::PrePlayBench => Some(Flow::PlayBench),
            Flow::PreAttachNrg => Some(Flow::AttachNrg),
            Flow::PreSwitch => Some(Flow::Switch),
            Flow::PrePlayItem => Some(Flow::PlayItem),
            Flow::PrePlayStadium => Some(Flow::PlayStadium),
            Flow::PrePlaySupporter => Some(Flow::PlaySupporter),
            Flow::PrePlayTool => Some(Flow::PlayTool),
            Flow::PreAddNrgToken => Some(Flow::AddNrgToken),
            Flow::PreAttack => Some(Flow::Attack),

            Flow::PlayBench => Some(self.play_bench(ctx)?),
            Flow::AttachNrg => Some(self.attach_energy(ctx)?),
            Flow::Switch => Some(self.switch(ctx)?),
            Flow::PlayItem => Some(self.play_trainer(TrainerKind::Item, Flow::PostPlayItem, ctx)?),
            Flow::PlayStadium => Some(self.play_trainer(TrainerKind::Stadium, Flow::PostPlayStadium, ctx)?),
            Flow::PlaySupporter => Some(self.play_trainer(TrainerKind::Supporter, Flow::PostPlaySupporter, ctx)?),
            Flow::PlayTool => Some(self.play_trainer(TrainerKind::Tool, Flow::PostPlayTool, ctx)?),
            Flow::AddNrgToken => Some(self.add_energy_token(ctx)?),
            Flow::Attack => Some(self.attack(ctx)?),

            Flow::PostPlayBench | Flow::PostPlayItem | Flow::PostPlayStadium | Flow::PostPlayTool => {
                Some(Flow::PhaseTwo)
            }
            Flow::PostAttachNrg | Flow::PostAddNrgToken => {
                let counters = &mut self.board.counters;
                counters.energy_attachments = counters.energy_attachments.saturating_sub(1);
                Some(Flow::PhaseTwo)
            }
            Flow::PostSwitch => {
                self.board.counters.swaps = self.board.counters.swaps.saturating_sub(1);
                Some(Flow::PhaseTwo)
            }
            Flow::PostPlaySupporter => {
                self.board.counters.supporters = self.board.counters.supporters.saturating_sub(1);
                Some(Flow::PhaseTwo)
            }
            Flow::PostAttack => Some(Flow::PostTurn),
            Flow::PostTurn => return Ok(TurnSignal::EndTurn),
            Flow::GenericAttach => None,
        };
        if let Some(next) = next {
            self.flow.push(next);
        }
        Ok(TurnSignal::Continue)
    }

    fn ask(&self, ctx: &mut TurnContext<'_>, kind: BattleQuery, options: Vec<CardOrWord>) -> Result<Vec<String>> {
        let query = Query::new(kind, options.into_iter().map(|o| o.0).collect());
        let answer = ctx
            .decisions
            .query(self.id, &query)
            .ok_or_else(|| EngineError::declined(kind))?;
        let words: Vec<String> = answer
            .iter()
            .flat_map(|part| part.split_whitespace())
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Err(EngineError::declined(kind));
        }
        Ok(words)
    }

    fn pick_card(&mut self) -> Result<Flow> {
        let deck = self.board.pile(piles::DECK)?;
        match deck.front() {
            None => {
                info!(target: "engine::flow", player = %self.id, "deck is empty, player loses");
                self.has_lost = true;
                Ok(Flow::PostTurn)
            }
            Some(uid) => {
                self.board.piles.transfer(uid, piles::DECK, piles::HAND, PilePosition::Back)?;
                Ok(Flow::PostPickCard)
            }
        }
    }

    fn phase_two(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let options = PhaseTwoChoice::vocabulary().into_iter().map(CardOrWord).collect();
        let words = self.ask(ctx, BattleQuery::PhaseTwo, options)?;
        let choice: PhaseTwoChoice = words[0]
            .parse()
            .map_err(|_| EngineError::invalid(format!("`{}` is not a phase two action", words[0])))?;
        Ok(choice.next_phase())
    }

    fn expect_in_hand(&self, uid: CardUid, wanted: &str, filter: impl Fn(&BattleCard) -> bool) -> Result<()> {
        match self.board.pile(piles::HAND)?.get(uid) {
            Some(card) if filter(card) => Ok(()),
            Some(card) => Err(EngineError::invalid(format!("{} is not {wanted}", card.label()))),
            None => Err(EngineError::invalid(format!("{uid} is not in hand"))),
        }
    }

    fn play_bench(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let options = CardOrWord::cards(self.board.hand_uids(BattleCard::is_character));
        let words = self.ask(ctx, BattleQuery::ToBench, options)?;
        let uid = parse_uid(&words[0])?;
        self.expect_in_hand(uid, "a character", BattleCard::is_character)?;

        self.board.piles.transfer(uid, piles::HAND, piles::BENCH, PilePosition::Back)?;
        let has_passive = self
            .board
            .pile(piles::BENCH)?
            .get(uid)
            .is_some_and(|card| declares(card, Capabilities::PASSIVE));
        if has_passive {
            self.use_ability(uid, piles::BENCH, ActionKind::Passive, ctx.opponent.board.active_core_mut(), ctx.config)?;
        }
        Ok(Flow::PostPlayBench)
    }

    fn play_trainer(&mut self, kind: TrainerKind, done: Flow, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let is_kind = |card: &BattleCard| card.trainer_kind() == Some(kind);
        let options = CardOrWord::cards(self.board.hand_uids(is_kind));
        let words = self.ask(ctx, kind.query(), options)?;
        let uid = parse_uid(&words[0])?;
        self.expect_in_hand(uid, &format!("a {kind}"), is_kind)?;

        let hand = self.board.piles.get_mut(piles::HAND)?;
        let slot = PilePosition::At(hand.position(uid).unwrap_or(hand.len()));
        let mut card = hand.remove(uid)?;
        let played = match card.as_trainer_mut() {
            Some(trainer) => trainer.play(&mut TrainerContext {
                uid,
                board: &mut self.board,
                flow_hooks: &mut self.flow_hooks,
                opponent: &mut ctx.opponent.board,
            }),
            None => Ok(false),
        };

        match played {
            Ok(true) => {
                debug!(target: "engine::flow", player = %self.id, card = %card.label(), "trainer played");
                if kind == TrainerKind::Stadium {
                    self.install_stadium(card, ctx)?;
                } else {
                    self.board.piles.get_mut(piles::DISCARD)?.register(card, None, PilePosition::Back)?;
                }
                Ok(done)
            }
            Ok(false) => {
                let label = card.label();
                self.board.piles.get_mut(piles::HAND)?.register(card, None, slot)?;
                Err(EngineError::invalid(format!("{label} cannot be played now")))
            }
            Err(err) => {
                self.board.piles.get_mut(piles::HAND)?.register(card, None, slot)?;
                Err(err)
            }
        }
    }

    /// Put `card` into play as the stadium; the one it replaces goes to its
    /// owner's discard.
    fn install_stadium(&mut self, card: BattleCard, ctx: &mut TurnContext<'_>) -> Result<()> {
        if let Some(old) = ctx.stadium.take() {
            let owner = if old.owner == self.id { &mut *self } else { &mut *ctx.opponent };
            if let Some(uid) = old.card.uid() {
                if owner.flow_hooks.owns_any(uid) {
                    owner.flow_hooks.purify(uid, None)?;
                }
            }
            info!(target: "engine::flow", replaced = %old.card.label(), owner = %old.owner, "stadium replaced");
            owner.board.piles.get_mut(piles::DISCARD)?.register(old.card, None, PilePosition::Back)?;
        }
        *ctx.stadium = Some(Stadium { owner: self.id, card });
        Ok(())
    }

    fn switch(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let active = self
            .board
            .active_uid()
            .ok_or_else(|| EngineError::invalid("No active character to switch out"))?;
        let options = CardOrWord::cards(self.board.character_uids(&[piles::BENCH]));
        let words = self.ask(ctx, BattleQuery::Switch, options)?;
        let incoming = parse_uid(&words[0])?;
        if self.board.character(incoming, &[piles::BENCH]).is_none() {
            return Err(EngineError::invalid(format!("{incoming} is not a benched character")));
        }

        let outgoing = self
            .board
            .character_mut(active, &[piles::ACTIVE])
            .ok_or_else(|| EngineError::invalid("No active character to switch out"))?;
        if !outgoing.can_swap() {
            return Err(EngineError::invalid(format!("{} cannot retreat", outgoing.name())));
        }
        if !outgoing.consume_energy_and_swap() {
            return Err(EngineError::invalid(format!("{} could not pay its retreat cost", outgoing.name())));
        }

        self.board.piles.exchange(active, piles::ACTIVE, incoming, piles::BENCH)?;
        Ok(Flow::PostSwitch)
    }

    fn add_energy_token(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        if self.board.counters.tokens == 0 {
            return Err(EngineError::invalid("No energy tokens left"));
        }
        let options = CardOrWord::cards(self.board.character_uids(&IN_PLAY));
        let words = self.ask(ctx, BattleQuery::AddNrg, options)?;
        let uid = parse_uid(&words[0])?;

        let character = self
            .board
            .character_mut(uid, &IN_PLAY)
            .ok_or_else(|| EngineError::invalid(format!("{uid} is not a character in play")))?;
        character.core_mut().vitals.energies[Instrument::All] += 1;
        self.board.counters.tokens -= 1;
        Ok(Flow::PostAddNrgToken)
    }

    fn attach_energy(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let characters = self.board.character_uids(&IN_PLAY);
        let energies = self.board.hand_uids(|card| card.energy_instrument().is_some());
        let options = characters
            .iter()
            .flat_map(|target| energies.iter().map(move |energy| CardOrWord(format!("{target} {energy}"))))
            .collect();
        let words = self.ask(ctx, BattleQuery::AttachNrg, options)?;
        let [target, energy] = [words.first(), words.get(1)];
        let (Some(target), Some(energy)) = (target, energy) else {
            return Err(EngineError::invalid("Choose a character and an energy card"));
        };
        let (target, energy) = (parse_uid(target)?, parse_uid(energy)?);

        let instrument = self
            .board
            .pile(piles::HAND)?
            .get(energy)
            .and_then(BattleCard::energy_instrument)
            .ok_or_else(|| EngineError::invalid(format!("{energy} is not an energy card in hand")))?;
        if self.board.character(target, &IN_PLAY).is_none() {
            return Err(EngineError::invalid(format!("{target} is not a character in play")));
        }

        self.board.piles.transfer(energy, piles::HAND, piles::DISCARD, PilePosition::Back)?;
        if let Some(character) = self.board.character_mut(target, &IN_PLAY) {
            character.core_mut().vitals.energies[instrument] += 1;
        }
        Ok(Flow::PostAttachNrg)
    }

    fn attack(&mut self, ctx: &mut TurnContext<'_>) -> Result<Flow> {
        let playable: Vec<AttackChoice> = match self.board.active_uid() {
            Some(active) => {
                let card = self.board.pile(piles::ACTIVE)?.get(active);
                [AttackChoice::MoveOne, AttackChoice::MoveTwo]
                    .into_iter()
                    .filter(|choice| card.is_some_and(|card| can_use(card, choice.action())))
                    .collect()
            }
            None => Vec::new(),
        };
        let Some(active) = self.board.active_uid().filter(|_| !playable.is_empty()) else {
            ctx.decisions.notify(self.id, "No moves can be played");
            return Ok(Flow::PostAttack);
        };

        let options = playable.iter().map(|choice| CardOrWord(choice.to_string())).collect();
        let words = self.ask(ctx, BattleQuery::Attack, options)?;
        let choice = match words[0].parse::<AttackChoice>() {
            Ok(choice) if playable.contains(&choice) => choice,
            _ => {
                ctx.decisions.notify(self.id, &format!("`{}` is not a playable move", words[0]));
                return Ok(Flow::Attack);
            }
        };

        let used = self.use_ability(
            active,
            piles::ACTIVE,
            choice.action(),
            ctx.opponent.board.active_core_mut(),
            ctx.config,
        )?;
        Ok(if used { Flow::PostAttack } else { Flow::Attack })
    }
}

impl Participant for BattlePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn on_exit(&mut self) -> ExitSignal {
        if self.has_lost {
            ExitSignal::Deactivate
        } else {
            ExitSignal::Stay
        }
    }
}

impl std::fmt::Debug for BattlePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattlePlayer")
            .field("id", &self.id)
            .field("board", &self.board)
            .field("flow", &self.flow)
            .field("flow_hooks", &self.flow_hooks)
            .field("has_lost", &self.has_lost)
            .finish()
    }
}

/// One entry of a query's option list.
struct CardOrWord(String);

impl CardOrWord {
    fn cards(uids: Vec<CardUid>) -> Vec<Self> {
        uids.into_iter().map(|uid| Self(uid.to_string())).collect()
    }
}

fn parse_uid(word: &str) -> Result<CardUid> {
    word.parse().map_err(|err: crate::core::ParseCardUidError| EngineError::invalid(err.to_string()))
}
