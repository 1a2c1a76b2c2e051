//! Resolution of one played hand.
//!
//! Capabilities are collected first from each joker's own handler, then
//! [`resolve`] classifies, scores every card and runs the jokers in slot
//! order. Joker state is read from per-pass scratch copies and written back
//! only in [`ResolveMode::Commit`]. A copy sees its source's record as it
//! stood when the current trigger began, whichever side of the source it sits.

use crate::{
    classify_hand_with_rules, evaluate_card, level_kind, Capabilities, Card, CardBonusRequest,
    CardBreakdown, CardContext, CardFollowUp, CardRole, ConsumableRequest, Contribution,
    Edition, HandContext, JokerBreakdown, JokerFollowUp, JokerKind, JokerSlot, JokerVars,
    ProbabilityModifier, ResolveMode, RuleEffect, Score, ScoreAccumulator, ScoreResult,
    ScoreTables, Seal, SessionCounters, Trigger,
};
use std::collections::HashSet;

/// Capabilities granted by the jokers' own handlers. Copy jokers grant
/// nothing, and neither do disabled jokers.
pub fn collect_capabilities(jokers: &[JokerSlot]) -> Capabilities {
    jokers
        .iter()
        .filter(|slot| !slot.disabled)
        .filter_map(JokerSlot::handler)
        .fold(Capabilities::default(), |caps, handler| {
            caps.union(handler.capabilities())
        })
}

/// For each slot, the slot whose handler runs there. `None` for disabled
/// slots, copies with nothing to copy, copies of disabled jokers and
/// copy cycles.
pub fn effective_sources(jokers: &[JokerSlot]) -> Vec<Option<usize>> {
    (0..jokers.len())
        .map(|slot| effective_source(jokers, slot))
        .collect()
}

fn effective_source(jokers: &[JokerSlot], slot: usize) -> Option<usize> {
    if jokers[slot].disabled {
        return None;
    }
    let mut visited = HashSet::new();
    let mut current = slot;
    loop {
        visited.insert(current);
        let next = match jokers[current].kind {
            JokerKind::Handler(_) => return Some(current),
            JokerKind::CopyRight => current + 1,
            JokerKind::CopyLeftmost => match (0..jokers.len()).find(|index| *index != current) {
                Some(index) => index,
                None => return None,
            },
        };
        let Some(target) = jokers.get(next) else {
            return None;
        };
        if visited.contains(&next) {
            log::warn!(
                "copy cycle through slot {next} ({}); slot {slot} has no effect",
                target.id
            );
            return None;
        }
        if target.disabled {
            log::warn!(
                "slot {slot} copies disabled joker {} in slot {next}",
                target.id
            );
            return None;
        }
        current = next;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    pub played: &'a [Card],
    pub held: &'a [Card],
    pub session: &'a SessionCounters,
    pub mode: ResolveMode,
}

impl<'a> ScoreRequest<'a> {
    pub fn new(played: &'a [Card], held: &'a [Card], session: &'a SessionCounters) -> Self {
        Self {
            played,
            held,
            session,
            mode: ResolveMode::Commit,
        }
    }

    pub fn preview(mut self) -> Self {
        self.mode = ResolveMode::Preview;
        self
    }
}

/// Probe and resolve in one call.
pub fn score_play(
    request: ScoreRequest<'_>,
    jokers: &mut [JokerSlot],
    tables: &ScoreTables,
    probability: &mut ProbabilityModifier,
) -> ScoreResult {
    let capabilities = collect_capabilities(jokers);
    resolve(request, capabilities, jokers, tables, probability)
}

pub fn resolve(
    request: ScoreRequest<'_>,
    capabilities: Capabilities,
    jokers: &mut [JokerSlot],
    tables: &ScoreTables,
    probability: &mut ProbabilityModifier,
) -> ScoreResult {
    if request.played.is_empty() {
        return ScoreResult::empty(request.mode);
    }
    let rules = capabilities.hand_rules();
    let mut hand = classify_hand_with_rules(request.played, rules);
    if capabilities.splash {
        hand.promote_kickers(request.played.len());
    }
    let level = request.session.level(level_kind(hand.kind));
    let (base_chips, base_mult) = tables.hand_base_for_level(hand.kind, level);
    hand.base_chips = base_chips;
    hand.base_mult = base_mult;

    let mut pass = Pass {
        jokers: &*jokers,
        sources: effective_sources(jokers),
        scratch: jokers.iter().map(|slot| slot.vars.clone()).collect(),
        seen: jokers.iter().map(|slot| slot.vars.clone()).collect(),
        breakdown: jokers
            .iter()
            .enumerate()
            .map(|(slot, joker)| JokerBreakdown {
                slot,
                id: joker.id.clone(),
                source: None,
                contribution: Contribution::default(),
            })
            .collect(),
        acc: ScoreAccumulator::new(Score {
            chips: base_chips,
            mult: base_mult,
        }),
        tables,
        probability,
        cards: Vec::new(),
        destroyed: Vec::new(),
        consumables: Vec::new(),
        card_bonuses: Vec::new(),
    };
    for (entry, source) in pass.breakdown.iter_mut().zip(&pass.sources) {
        entry.source = *source;
    }

    let scene = HandContext {
        played: request.played,
        held: request.held,
        hand: &hand,
        rules,
        session: request.session,
    };

    for (position, &index) in hand.scoring.iter().enumerate() {
        let Some(card) = request.played.get(index) else {
            continue;
        };
        let ctx = CardContext {
            card,
            index,
            position,
            scene: &scene,
        };
        pass.card(CardRole::Played, &ctx);
    }

    for (index, card) in request.held.iter().enumerate() {
        let ctx = CardContext {
            card,
            index,
            position: index,
            scene: &scene,
        };
        pass.card(CardRole::Held, &ctx);
    }

    pass.begin_event();
    for slot in 0..pass.jokers.len() {
        pass.independent(slot, &scene);
    }

    let Pass {
        scratch,
        breakdown,
        acc,
        cards,
        destroyed,
        consumables,
        card_bonuses,
        ..
    } = pass;

    if request.mode == ResolveMode::Commit {
        for (slot, vars) in jokers.iter_mut().zip(scratch) {
            slot.vars = vars;
        }
    }

    let total = acc.score();
    let result = ScoreResult {
        mode: request.mode,
        level,
        chips: total.chips,
        mult: total.mult,
        score: total.total(),
        cards,
        jokers: breakdown,
        money: acc.money(),
        destroyed,
        consumables,
        card_bonuses,
        hand,
    };
    log::debug!(
        "{} ({:?}): {} chips x {} mult = {}",
        result.hand.description,
        result.mode,
        result.chips,
        result.mult,
        result.score
    );
    result
}

/// Purple Seal tarot requests for a discard.
pub fn resolve_discard(
    cards: &[Card],
    tables: &ScoreTables,
    probability: &mut ProbabilityModifier,
) -> Vec<ConsumableRequest> {
    cards
        .iter()
        .flat_map(|card| {
            evaluate_card(card, CardRole::Discarded, 1, tables, None, probability).follow_ups
        })
        .filter_map(|follow_up| match follow_up {
            CardFollowUp::CreateTarot => Some(ConsumableRequest::Tarot),
            CardFollowUp::CreatePlanet(hand) => Some(ConsumableRequest::Planet(hand)),
            CardFollowUp::Destroy => None,
        })
        .collect()
}

struct Pass<'p> {
    jokers: &'p [JokerSlot],
    sources: Vec<Option<usize>>,
    scratch: Vec<JokerVars>,
    /// Records as they stood when the current trigger began; copies read these.
    seen: Vec<JokerVars>,
    breakdown: Vec<JokerBreakdown>,
    acc: ScoreAccumulator,
    tables: &'p ScoreTables,
    probability: &'p mut ProbabilityModifier,
    cards: Vec<CardBreakdown>,
    destroyed: Vec<usize>,
    consumables: Vec<ConsumableRequest>,
    card_bonuses: Vec<CardBonusRequest>,
}

impl Pass<'_> {
    fn retriggers(&self, role: CardRole, ctx: &CardContext<'_>) -> u32 {
        let matching = self
            .sources
            .iter()
            .flatten()
            .filter_map(|source| self.jokers[*source].handler())
            .filter(|handler| match role {
                CardRole::Played => handler.retrigger_scored(ctx),
                CardRole::Held => handler.retrigger_held(ctx),
                CardRole::Discarded => false,
            })
            .count() as u32;
        let red = u32::from(ctx.card.seal == Some(Seal::Red));
        1 + matching + red
    }

    fn card(&mut self, role: CardRole, ctx: &CardContext<'_>) {
        if ctx.card.debuffed {
            log::trace!("{} ({role:?}) is debuffed", ctx.card);
            self.cards.push(CardBreakdown {
                index: ctx.index,
                role,
                triggers: 0,
                contribution: Contribution::default(),
            });
            return;
        }
        let requested = self.retriggers(role, ctx);
        let outcome = evaluate_card(
            ctx.card,
            role,
            requested,
            self.tables,
            ctx.scene.session.last_hand,
            self.probability,
        );
        log::trace!(
            "{} ({role:?}) x{}: {:?}",
            ctx.card,
            outcome.triggers,
            outcome.contribution
        );
        self.acc.add(&outcome.contribution);
        for follow_up in &outcome.follow_ups {
            match follow_up {
                CardFollowUp::Destroy => self.destroyed.push(ctx.index),
                CardFollowUp::CreatePlanet(hand) => {
                    self.consumables.push(ConsumableRequest::Planet(*hand))
                }
                CardFollowUp::CreateTarot => self.consumables.push(ConsumableRequest::Tarot),
            }
        }
        self.cards.push(CardBreakdown {
            index: ctx.index,
            role,
            triggers: outcome.triggers,
            contribution: outcome.contribution,
        });

        let trigger = match role {
            CardRole::Played => Trigger::Scored(*ctx),
            CardRole::Held => Trigger::Held(*ctx),
            CardRole::Discarded => return,
        };
        for _ in 0..outcome.triggers {
            self.begin_event();
            for slot in 0..self.jokers.len() {
                self.run(slot, &trigger);
            }
        }
    }

    fn begin_event(&mut self) {
        self.seen.clone_from(&self.scratch);
    }

    fn independent(&mut self, slot: usize, scene: &HandContext<'_>) {
        let jokers = self.jokers;
        let joker = &jokers[slot];
        if joker.disabled {
            return;
        }
        let edition = joker
            .edition
            .map(|edition| self.tables.card_attrs.edition(edition));
        if let Some(def) = edition {
            let mut before = Contribution::default();
            before.apply(RuleEffect::AddChips(def.chips));
            before.apply(RuleEffect::AddMult(def.mult_add));
            self.record(slot, &before);
        }
        self.run(slot, &Trigger::Independent(scene));
        if let Some(def) = edition.filter(|def| def.mult_mul != 0.0) {
            let mut after = Contribution::default();
            after.apply(RuleEffect::MultiplyMult(def.mult_mul));
            self.record(slot, &after);
        }
        if joker.edition == Some(Edition::Negative) {
            log::trace!("slot {slot} is negative; no scoring effect");
        }
    }

    fn run(&mut self, slot: usize, trigger: &Trigger<'_>) {
        let Some(source) = self.sources[slot] else {
            return;
        };
        let jokers = self.jokers;
        let Some(handler) = jokers[source].handler() else {
            return;
        };
        let vars = if source == slot {
            &self.scratch[source]
        } else {
            &self.seen[source]
        };
        let delta = handler.effect(trigger, vars, self.probability);
        if delta.is_empty() {
            return;
        }
        log::trace!(
            "slot {slot} ({}) via {source}: {:?}",
            jokers[slot].id,
            delta.contribution
        );
        self.record(slot, &delta.contribution);
        if source == slot {
            for (key, value) in delta.writes {
                self.scratch[slot].insert(key, value);
            }
        }
        if let Trigger::Scored(card) = trigger {
            for follow_up in delta.follow_ups {
                match follow_up {
                    JokerFollowUp::CardBonus { chips } => {
                        self.card_bonuses.push(CardBonusRequest {
                            index: card.index,
                            chips,
                        })
                    }
                }
            }
        }
    }

    fn record(&mut self, slot: usize, contribution: &Contribution) {
        self.acc.add(contribution);
        self.breakdown[slot].contribution.merge(contribution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jokers;

    fn slots(ids: &[&str]) -> Vec<JokerSlot> {
        ids.iter()
            .map(|id| jokers::slot(id).expect("builtin"))
            .collect()
    }

    #[test]
    fn capabilities_come_from_own_handlers() {
        let mut jokers = slots(&["blueprint", "four_fingers", "splash"]);
        let caps = collect_capabilities(&jokers);
        assert!(caps.four_fingers && caps.splash);
        assert!(!caps.shortcut);
        jokers[1].disabled = true;
        assert!(!collect_capabilities(&jokers).four_fingers);
    }

    #[test]
    fn copy_sources() {
        let jokers = slots(&["blueprint", "joker", "brainstorm"]);
        assert_eq!(effective_sources(&jokers), vec![Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn chained_copies_follow_through() {
        let jokers = slots(&["blueprint", "blueprint", "joker"]);
        assert_eq!(effective_sources(&jokers), vec![Some(2), Some(2), Some(2)]);
    }

    #[test]
    fn copy_cycles_resolve_to_nothing() {
        let jokers = slots(&["blueprint", "brainstorm"]);
        assert_eq!(effective_sources(&jokers), vec![None, None]);
        let jokers = slots(&["brainstorm"]);
        assert_eq!(effective_sources(&jokers), vec![None]);
        let jokers = slots(&["joker", "blueprint"]);
        assert_eq!(effective_sources(&jokers), vec![Some(0), None]);
    }

    #[test]
    fn disabled_sources_are_not_copied() {
        let mut jokers = slots(&["blueprint", "joker"]);
        jokers[1].disabled = true;
        assert_eq!(effective_sources(&jokers), vec![None, None]);
    }

    #[test]
    fn empty_play_is_zero() {
        let session = SessionCounters::default();
        let mut jokers = slots(&["joker"]);
        let mut probability = ProbabilityModifier::new(1);
        let result = score_play(
            ScoreRequest::new(&[], &[], &session),
            &mut jokers,
            &ScoreTables::standard(),
            &mut probability,
        );
        assert_eq!(result.score, 0.0);
        assert!(result.jokers.is_empty());
    }

    #[test]
    fn discard_reports_purple_seals() {
        let cards = vec![
            Card::standard(crate::Suit::Spades, crate::Rank::Two).with_seal(Seal::Purple),
            Card::standard(crate::Suit::Spades, crate::Rank::Three).with_seal(Seal::Blue),
            Card::standard(crate::Suit::Spades, crate::Rank::Four).with_seal(Seal::Purple),
        ];
        let mut probability = ProbabilityModifier::new(1);
        let requests = resolve_discard(&cards, &ScoreTables::standard(), &mut probability);
        assert_eq!(requests, vec![ConsumableRequest::Tarot, ConsumableRequest::Tarot]);
    }
}
