use crate::{
    var, Capabilities, CardContext, HandContext, JokerDelta, JokerFollowUp, JokerHandler,
    JokerKind, JokerSlot, JokerVars, ParseError, ProbabilityModifier, Rank, Suit, Trigger,
};
use std::rc::Rc;

pub const BUILTIN_IDS: [&str; 21] = [
    "four_fingers",
    "shortcut",
    "smeared_joker",
    "splash",
    "blueprint",
    "brainstorm",
    "sock_and_buskin",
    "hack",
    "hanging_chad",
    "mime",
    "joker",
    "greedy_joker",
    "lusty_joker",
    "wrathful_joker",
    "gluttonous_joker",
    "scary_face",
    "baron",
    "ride_the_bus",
    "bloodstone",
    "business_card",
    "hiker",
];

pub fn by_id(id: &str) -> Result<JokerKind, ParseError> {
    let handler: Rc<dyn JokerHandler> = match id {
        "blueprint" => return Ok(JokerKind::CopyRight),
        "brainstorm" => return Ok(JokerKind::CopyLeftmost),
        "four_fingers" => Rc::new(Relaxation {
            id: "four_fingers",
            grants: Capabilities {
                four_fingers: true,
                ..Default::default()
            },
        }),
        "shortcut" => Rc::new(Relaxation {
            id: "shortcut",
            grants: Capabilities {
                shortcut: true,
                ..Default::default()
            },
        }),
        "smeared_joker" => Rc::new(Relaxation {
            id: "smeared_joker",
            grants: Capabilities {
                smeared_suits: true,
                ..Default::default()
            },
        }),
        "splash" => Rc::new(Relaxation {
            id: "splash",
            grants: Capabilities {
                splash: true,
                ..Default::default()
            },
        }),
        "sock_and_buskin" => Rc::new(SockAndBuskin),
        "hack" => Rc::new(Hack),
        "hanging_chad" => Rc::new(HangingChad),
        "mime" => Rc::new(Mime),
        "joker" => Rc::new(Joker),
        "greedy_joker" => Rc::new(SuitJoker::new("greedy_joker", Suit::Diamonds)),
        "lusty_joker" => Rc::new(SuitJoker::new("lusty_joker", Suit::Hearts)),
        "wrathful_joker" => Rc::new(SuitJoker::new("wrathful_joker", Suit::Spades)),
        "gluttonous_joker" => Rc::new(SuitJoker::new("gluttonous_joker", Suit::Clubs)),
        "scary_face" => Rc::new(ScaryFace),
        "baron" => Rc::new(Baron),
        "ride_the_bus" => Rc::new(RideTheBus),
        "bloodstone" => Rc::new(Bloodstone),
        "business_card" => Rc::new(BusinessCard),
        "hiker" => Rc::new(Hiker),
        other => return Err(ParseError::UnknownJoker(other.to_string())),
    };
    Ok(JokerKind::Handler(handler))
}

/// A slot for a built-in joker.
pub fn slot(id: &str) -> Result<JokerSlot, ParseError> {
    let norm = id.trim().to_lowercase();
    let kind = by_id(&norm)?;
    Ok(JokerSlot::new(norm, kind))
}

#[derive(Debug)]
struct Relaxation {
    id: &'static str,
    grants: Capabilities,
}

impl JokerHandler for Relaxation {
    fn id(&self) -> &'static str {
        self.id
    }

    fn capabilities(&self) -> Capabilities {
        self.grants
    }
}

#[derive(Debug)]
struct SockAndBuskin;

impl JokerHandler for SockAndBuskin {
    fn id(&self) -> &'static str {
        "sock_and_buskin"
    }

    fn retrigger_scored(&self, card: &CardContext<'_>) -> bool {
        card.card.is_face()
    }
}

#[derive(Debug)]
struct Hack;

impl JokerHandler for Hack {
    fn id(&self) -> &'static str {
        "hack"
    }

    fn retrigger_scored(&self, card: &CardContext<'_>) -> bool {
        !card.card.is_stone() && (2..=5).contains(&card.card.rank.value())
    }
}

#[derive(Debug)]
struct HangingChad;

impl JokerHandler for HangingChad {
    fn id(&self) -> &'static str {
        "hanging_chad"
    }

    fn retrigger_scored(&self, card: &CardContext<'_>) -> bool {
        card.position == 0
    }
}

#[derive(Debug)]
struct Mime;

impl JokerHandler for Mime {
    fn id(&self) -> &'static str {
        "mime"
    }

    fn retrigger_held(&self, _card: &CardContext<'_>) -> bool {
        true
    }
}

#[derive(Debug)]
struct Joker;

impl JokerHandler for Joker {
    fn id(&self) -> &'static str {
        "joker"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Independent(_) => JokerDelta::mult(4.0),
            _ => JokerDelta::default(),
        }
    }
}

#[derive(Debug)]
struct SuitJoker {
    id: &'static str,
    suit: Suit,
}

impl SuitJoker {
    fn new(id: &'static str, suit: Suit) -> Self {
        Self { id, suit }
    }
}

impl JokerHandler for SuitJoker {
    fn id(&self) -> &'static str {
        self.id
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Scored(card)
                if card
                    .card
                    .matches_suit(self.suit, card.scene.rules.smeared_suits) =>
            {
                JokerDelta::mult(3.0)
            }
            _ => JokerDelta::default(),
        }
    }
}

#[derive(Debug)]
struct ScaryFace;

impl JokerHandler for ScaryFace {
    fn id(&self) -> &'static str {
        "scary_face"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Scored(card) if card.card.is_face() => JokerDelta::chips(30),
            _ => JokerDelta::default(),
        }
    }
}

#[derive(Debug)]
struct Baron;

impl JokerHandler for Baron {
    fn id(&self) -> &'static str {
        "baron"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Held(card) if !card.card.is_stone() && card.card.rank == Rank::King => {
                JokerDelta::x_mult(1.5)
            }
            _ => JokerDelta::default(),
        }
    }
}

/// Gains +1 mult for every consecutive hand without a scoring face card.
#[derive(Debug)]
struct RideTheBus;

impl RideTheBus {
    const KEY: &'static str = "mult";

    fn has_face(scene: &HandContext<'_>) -> bool {
        scene.scoring_cards().any(|card| card.is_face())
    }
}

impl JokerHandler for RideTheBus {
    fn id(&self) -> &'static str {
        "ride_the_bus"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        let Trigger::Independent(scene) = trigger else {
            return JokerDelta::default();
        };
        if Self::has_face(scene) {
            return JokerDelta::default().write(Self::KEY, 0.0);
        }
        let mult = var(vars, Self::KEY) + 1.0;
        JokerDelta::mult(mult).write(Self::KEY, mult)
    }
}

#[derive(Debug)]
struct Bloodstone;

impl JokerHandler for Bloodstone {
    fn id(&self) -> &'static str {
        "bloodstone"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Scored(card)
                if card
                    .card
                    .matches_suit(Suit::Hearts, card.scene.rules.smeared_suits)
                    && probability.one_in(2) =>
            {
                JokerDelta::x_mult(1.5)
            }
            _ => JokerDelta::default(),
        }
    }
}

#[derive(Debug)]
struct BusinessCard;

impl JokerHandler for BusinessCard {
    fn id(&self) -> &'static str {
        "business_card"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Scored(card) if card.card.is_face() && probability.one_in(2) => {
                JokerDelta::money(2)
            }
            _ => JokerDelta::default(),
        }
    }
}

#[derive(Debug)]
struct Hiker;

impl JokerHandler for Hiker {
    fn id(&self) -> &'static str {
        "hiker"
    }

    fn effect(
        &self,
        trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        match trigger {
            Trigger::Scored(_) => {
                JokerDelta::default().follow_up(JokerFollowUp::CardBonus { chips: 5 })
            }
            _ => JokerDelta::default(),
        }
    }
}
