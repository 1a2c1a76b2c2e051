use chipmult_core::{
    collect_capabilities, jokers, resolve, score_play, Card, CardRole, Edition, Enhancement,
    JokerDelta, JokerHandler, JokerSlot, JokerVars, ProbabilityModifier, ResolveMode,
    ScoreRequest, ScoreResult, ScoreTables, Seal, SessionCounters, Suit, Trigger,
};
use std::rc::Rc;

fn cards(codes: &[&str]) -> Vec<Card> {
    codes
        .iter()
        .map(|code| code.parse().expect("card code"))
        .collect()
}

fn slots(ids: &[&str]) -> Vec<JokerSlot> {
    ids.iter()
        .map(|id| jokers::slot(id).expect("builtin joker"))
        .collect()
}

struct Table {
    session: SessionCounters,
    tables: ScoreTables,
    probability: ProbabilityModifier,
}

impl Table {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            session: SessionCounters::default(),
            tables: ScoreTables::standard(),
            probability: ProbabilityModifier::new(42),
        }
    }

    fn certain() -> Self {
        let mut table = Self::new();
        table.probability.set_amplifier(16);
        table
    }

    fn play(&mut self, played: &[Card], held: &[Card], jokers: &mut [JokerSlot]) -> ScoreResult {
        let request = ScoreRequest::new(played, held, &self.session);
        score_play(request, jokers, &self.tables, &mut self.probability)
    }

    fn preview(&mut self, played: &[Card], jokers: &mut [JokerSlot]) -> ScoreResult {
        let request = ScoreRequest::new(played, &[], &self.session).preview();
        score_play(request, jokers, &self.tables, &mut self.probability)
    }
}

#[test]
fn plain_joker_adds_mult() {
    let mut table = Table::new();
    let result = table.play(&cards(&["2S"]), &[], &mut slots(&["joker"]));
    assert_eq!(result.chips, 7);
    assert_eq!(result.mult, 5.0);
    assert_eq!(result.jokers[0].contribution.mult, 4.0);
}

#[test]
fn blueprint_doubles_its_neighbour() {
    let mut table = Table::new();
    let played = cards(&["2S"]);
    let result = table.play(&played, &[], &mut slots(&["blueprint", "joker"]));
    assert_eq!(result.mult, 9.0);
    assert_eq!(result.score, 63.0);
    assert_eq!(result.jokers[0].source, Some(1));
    assert_eq!(result.jokers[0].contribution.mult, 4.0);
}

#[test]
fn brainstorm_copies_leftmost_exactly_once() {
    let mut table = Table::new();
    let played = cards(&["2S"]);
    let result = table.play(&played, &[], &mut slots(&["joker", "brainstorm"]));
    assert_eq!(result.mult, 9.0);

    // Blueprint at the end has nothing to its right.
    let result = table.play(&played, &[], &mut slots(&["joker", "brainstorm", "blueprint"]));
    assert_eq!(result.mult, 9.0);
    assert_eq!(result.jokers[2].source, None);
}

#[test]
fn mutual_copies_do_nothing() {
    let mut table = Table::new();
    let played = cards(&["AS", "AH"]);
    let result = table.play(&played, &[], &mut slots(&["blueprint", "brainstorm"]));
    assert_eq!(result.score, 54.0);
    assert!(result.jokers.iter().all(|joker| joker.source.is_none()));
}

#[test]
fn retrigger_predicates_stack() {
    let mut table = Table::new();
    let played = vec!["5H"
        .parse::<Card>()
        .expect("card")
        .with_enhancement(Enhancement::Mult)
        .with_edition(Edition::Polychrome)];
    let result = table.play(&played, &[], &mut slots(&["hack", "hanging_chad"]));
    let card = result.card(CardRole::Played, 0).expect("breakdown");
    assert_eq!(card.triggers, 3);
    assert_eq!(card.contribution.chips, 15);
    assert_eq!(card.contribution.mult, 12.0);
    assert_eq!(card.contribution.x_mult, 1.5);
    assert_eq!(result.chips, 20);
    assert_eq!(result.mult, 19.5);

    let sealed = vec![played[0].with_seal(Seal::Red)];
    let result = table.play(&sealed, &[], &mut slots(&["hack", "hanging_chad"]));
    assert_eq!(result.cards[0].triggers, 4);
}

#[test]
fn face_retrigger_and_copied_predicates() {
    let mut table = Table::new();
    let result = table.play(&cards(&["KS", "KH"]), &[], &mut slots(&["sock_and_buskin"]));
    assert_eq!(result.chips, 45);
    assert_eq!(result.score, 90.0);

    let result = table.play(
        &cards(&["KS"]),
        &[],
        &mut slots(&["blueprint", "sock_and_buskin"]),
    );
    assert_eq!(result.cards[0].triggers, 3);
    assert_eq!(result.chips, 35);
}

#[test]
fn per_card_handlers_run_per_trigger() {
    let mut table = Table::new();
    let result = table.play(
        &cards(&["KS"]),
        &[],
        &mut slots(&["sock_and_buskin", "scary_face"]),
    );
    assert_eq!(result.chips, 5 + 20 + 60);
    assert_eq!(result.jokers[1].contribution.chips, 60);
}

#[test]
fn splash_scores_kickers() {
    let mut table = Table::new();
    let played = cards(&["KS", "KH", "4C"]);
    let result = table.play(&played, &[], &mut slots(&["splash"]));
    assert_eq!(result.hand.scoring, vec![0, 1, 2]);
    assert!(result.hand.kickers.is_empty());
    assert_eq!(result.chips, 29);
    assert_eq!(result.score, 58.0);
}

#[test]
fn mime_retriggers_held_handlers_not_steel() {
    let mut table = Table::new();
    let played = cards(&["AS"]);
    let held: Vec<Card> = ["KS", "KH", "KD"]
        .iter()
        .map(|code| {
            code.parse::<Card>()
                .expect("card")
                .with_enhancement(Enhancement::Steel)
        })
        .collect();

    let result = table.play(&played, &held, &mut slots(&["mime"]));
    assert_eq!(result.chips, 16);
    assert_eq!(result.mult, 3.375);
    assert!(result.cards.iter().filter(|c| c.role == CardRole::Held).all(|c| c.triggers == 2));

    let result = table.play(&played, &held, &mut slots(&["mime", "baron"]));
    assert_eq!(result.mult, 1.5f64.powi(9));
    assert_eq!(result.score, 16.0 * 1.5f64.powi(9));
}

#[test]
fn joker_editions() {
    let mut table = Table::new();
    let played = cards(&["2S"]);
    let mut foil = vec![jokers::slot("joker").expect("joker").with_edition(Edition::Foil)];
    let result = table.play(&played, &[], &mut foil);
    assert_eq!(result.chips, 57);
    assert_eq!(result.mult, 5.0);

    let mut poly = vec![jokers::slot("joker").expect("joker").with_edition(Edition::Polychrome)];
    let result = table.play(&played, &[], &mut poly);
    assert_eq!(result.mult, 7.5);
    assert_eq!(result.jokers[0].contribution.x_mult, 1.5);

    let mut negative = vec![jokers::slot("joker").expect("joker").with_edition(Edition::Negative)];
    assert_eq!(table.play(&played, &[], &mut negative).mult, 5.0);
}

#[test]
fn disabled_jokers_and_debuffed_cards() {
    let mut table = Table::new();
    let mut slots = slots(&["joker", "sock_and_buskin"]);
    slots[0].disabled = true;
    let mut played = cards(&["KS", "KH"]);
    played[0].debuffed = true;
    played[0].seal = Some(Seal::Red);
    let result = table.play(&played, &[], &mut slots);
    assert_eq!(result.cards[0].triggers, 0);
    assert_eq!(result.cards[1].triggers, 2);
    assert_eq!(result.chips, 25);
    assert_eq!(result.mult, 2.0);
    assert!(result.jokers[0].contribution.is_neutral());
}

#[test]
fn preview_writes_nothing_commit_does() {
    let mut table = Table::new();
    let played = cards(&["2S", "3H"]);
    let mut slots = vec![jokers::slot("ride_the_bus").expect("joker").with_var("mult", 2.0)];

    let first = table.preview(&played, &mut slots);
    let second = table.preview(&played, &mut slots);
    assert_eq!(first, second);
    assert_eq!(slots[0].var("mult"), 2.0);
    assert_eq!(first.mult, 4.0);
    assert_eq!(first.score, 32.0);

    let committed = table.play(&played, &[], &mut slots);
    assert_eq!(committed.score, first.score);
    assert_eq!(slots[0].var("mult"), 3.0);
    table.play(&played, &[], &mut slots);
    assert_eq!(slots[0].var("mult"), 4.0);

    table.play(&cards(&["KS"]), &[], &mut slots);
    assert_eq!(slots[0].var("mult"), 0.0);
}

#[test]
fn copies_read_but_never_write_source_state() {
    let mut table = Table::new();
    let played = cards(&["2S"]);
    let mut slots = slots(&["blueprint", "ride_the_bus"]);
    slots[1].vars.insert("mult".to_string(), 2.0);
    let result = table.play(&played, &[], &mut slots);
    assert_eq!(result.mult, 7.0);
    assert_eq!(slots[1].var("mult"), 3.0);
    assert!(slots[0].vars.is_empty());
}

#[test]
fn stateful_copies_match_the_source_on_either_side() {
    let mut table = Table::new();
    let played = cards(&["2S"]);
    let bus = |ids: &[&str]| {
        let mut slots = slots(ids);
        for slot in slots.iter_mut().filter(|slot| slot.id == "ride_the_bus") {
            slot.vars.insert("mult".to_string(), 2.0);
        }
        slots
    };

    let alone = table.preview(&played, &mut bus(&["ride_the_bus"]));
    assert_eq!(alone.mult, 4.0);

    for ids in [["blueprint", "ride_the_bus"], ["ride_the_bus", "brainstorm"]] {
        let result = table.preview(&played, &mut bus(&ids));
        assert_eq!(result.mult, 1.0 + 2.0 * 3.0, "{ids:?}");
        assert!(result.jokers.iter().all(|joker| joker.contribution.mult == 3.0));
    }

    let result = table.preview(&played, &mut bus(&["ride_the_bus", "brainstorm", "blueprint"]));
    assert_eq!(result.mult, 7.0);
    assert_eq!(result.jokers[2].source, None);

    let mut committed = bus(&["ride_the_bus", "brainstorm"]);
    table.play(&played, &[], &mut committed);
    assert_eq!(committed[0].var("mult"), 3.0);
    assert!(committed[1].vars.is_empty());
}

/// Adds ten chips per card it has already seen, plus ten.
#[derive(Debug)]
struct Tally;

impl JokerHandler for Tally {
    fn id(&self) -> &'static str {
        "tally"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        let Trigger::Scored(_) = trigger else {
            return JokerDelta::default();
        };
        let count = vars.get("count").copied().unwrap_or(0.0) + 1.0;
        JokerDelta::chips(count as i64 * 10).write("count", count)
    }
}

#[test]
fn per_card_state_is_copied_as_the_source_saw_it() {
    let mut table = Table::new();
    let played = cards(&["2S", "2H"]);
    let tally = || JokerSlot::from_handler(Rc::new(Tally));

    let alone = table.preview(&played, &mut [tally()]);
    assert_eq!(alone.chips, 5 + 4 + 30);

    let mut right = [tally(), jokers::slot("brainstorm").expect("joker")];
    let mut left = [jokers::slot("blueprint").expect("joker"), tally()];
    for slots in [&mut right[..], &mut left[..]] {
        let result = table.play(&played, &[], slots);
        assert_eq!(result.chips, 5 + 4 + 60);
        assert_eq!(result.score, 138.0);
        assert!(result.jokers.iter().all(|joker| joker.contribution.chips == 30));
    }
    assert_eq!(right[0].var("count"), 2.0);
    assert!(right[1].vars.is_empty());
    assert_eq!(left[1].var("count"), 2.0);
    assert!(left[0].vars.is_empty());
}

#[test]
fn preview_still_rolls() {
    let mut table = Table::certain();
    let played = cards(&["2H"]);
    let mut slots = slots(&["bloodstone"]);
    let before = table.probability.len();
    let result = table.preview(&played, &mut slots);
    assert_eq!(result.mult, 1.5);
    assert_eq!(table.probability.len(), before + 1);
}

#[test]
fn suit_jokers_follow_smeared_suits() {
    let mut table = Table::new();
    let played = cards(&["2D"]);
    assert_eq!(table.play(&played, &[], &mut slots(&["lusty_joker"])).mult, 1.0);
    let result = table.play(&played, &[], &mut slots(&["lusty_joker", "smeared_joker"]));
    assert_eq!(result.mult, 4.0);
    assert_eq!(result.score, 28.0);
}

#[test]
fn hiker_requests_bonus_per_trigger() {
    let mut table = Table::new();
    let played = vec![Card::standard(Suit::Spades, chipmult_core::Rank::Ace).with_seal(Seal::Red)];
    let result = table.play(&played, &[], &mut slots(&["hiker"]));
    assert_eq!(result.card_bonuses.len(), 2);
    assert!(result.card_bonuses.iter().all(|bonus| bonus.index == 0 && bonus.chips == 5));
    assert_eq!(played[0].bonus_chips, 0);
}

#[test]
fn business_card_pays_on_faces() {
    let mut table = Table::certain();
    let result = table.play(&cards(&["QS", "QH"]), &[], &mut slots(&["business_card"]));
    assert_eq!(result.money, 4);
}

#[test]
fn resolve_takes_explicit_capabilities() {
    let mut table = Table::new();
    let played = cards(&["KS", "KH", "4C"]);
    let mut slots = slots(&["splash"]);
    let capabilities = collect_capabilities(&slots);
    let request = ScoreRequest {
        mode: ResolveMode::Preview,
        ..ScoreRequest::new(&played, &[], &table.session)
    };
    let result = resolve(request, capabilities, &mut slots, &table.tables, &mut table.probability);
    assert_eq!(result.mode, ResolveMode::Preview);
    assert_eq!(result.hand.scoring.len(), 3);
}
