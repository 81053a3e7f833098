use super::{Focus, Indicator, Item, OpenQuestion};
use crate::core::{ItemId, Phase, QuestionId};

use Focus::{Awareness as A, Behaviour as B, Confidence as C, Knowledge as K};

const RATED: [(Focus, &str); 32] = [
    // Self-Readiness (1-6)
    (K, "I can clearly articulate my personal values and how they influence my decisions"),
    (K, "I understand my preferred working style and how it differs from others"),
    (A, "I recognise how my behaviour changes when I am under pressure"),
    (C, "I project credibility and presence when communicating with others"),
    (B, "I adapt my approach effectively when working with people who have different styles to me"),
    (B, "I actively seek feedback on my own performance and act on it"),
    // Practical Readiness (7-14)
    (B, "I prioritise my time effectively, focusing on high-value activities"),
    (B, "I protect time for important but non-urgent work rather than constantly firefighting"),
    (B, "I delegate tasks appropriately rather than taking on too much myself"),
    (K, "I understand how to match my delegation approach to the individual and the task"),
    (B, "I listen to fully understand before forming my response"),
    (B, "I address difficult issues directly rather than avoiding or delaying them"),
    (B, "I give feedback that is specific, constructive and focused on improvement"),
    (C, "I am comfortable receiving feedback, even when it is challenging to hear"),
    // Professional Readiness (15-22)
    (B, "I communicate with clarity, adapting my message for different audiences"),
    (B, "I build trust quickly through consistency between my words and actions"),
    (K, "I understand what creates and what erodes trust in working relationships"),
    (B, "I run meetings that are focused, productive and worth people's time"),
    (B, "I conduct effective check-ins that go beyond just task updates"),
    (B, "I set clear goals so people understand what success looks like"),
    (B, "I take ownership of outcomes rather than attributing problems to external factors"),
    (B, "I hold myself and others accountable for commitments made"),
    // Team Readiness (23-30)
    (K, "I understand the key HR processes and policies relevant to my role"),
    (C, "I feel equipped to handle common people management situations"),
    (B, "I model and actively promote safety-first behaviours"),
    (B, "I speak up about safety concerns, even when it might be uncomfortable"),
    (B, "I help my team understand and navigate change rather than just announcing it"),
    (B, "I maintain my own effectiveness during periods of pressure and uncertainty"),
    (A, "I recognise signs of stress in myself and take action before it escalates"),
    (B, "I support the wellbeing of my team, particularly during demanding periods"),
    // Overall (31-32)
    (C, "Overall, I feel ready to perform effectively in my role"),
    (C, "I am confident I can build a high-performing team from day one"),
];

fn indicator_for(id: u8) -> Indicator {
    match id {
        1..=6 => Indicator::SelfReadiness,
        7..=14 => Indicator::PracticalReadiness,
        15..=22 => Indicator::ProfessionalReadiness,
        23..=30 => Indicator::TeamReadiness,
        _ => Indicator::Overall,
    }
}

pub(super) fn rated_items() -> Vec<Item> {
    (1u8..)
        .zip(RATED)
        .map(|(id, (focus, prompt_text))| Item {
            id: ItemId::new(id),
            indicator: indicator_for(id),
            focus,
            prompt_text,
        })
        .collect()
}

const OPEN: [(Phase, u8, &str, &str); 6] = [
    (
        Phase::Pre,
        1,
        "What aspect of your new role are you most looking forward to?",
        "what participants are most looking forward to in their new role",
    ),
    (
        Phase::Pre,
        2,
        "What is the one area where you would most like to build your confidence or skills?",
        "where participants most want to build confidence or skills",
    ),
    (
        Phase::Pre,
        3,
        "What concerns, if any, do you have about the launch period ahead?",
        "concerns about the launch period ahead",
    ),
    (
        Phase::Post,
        1,
        "What was your most valuable takeaway from the programme?",
        "most valuable takeaway from the programme",
    ),
    (
        Phase::Post,
        2,
        "What will you do differently as a result of attending?",
        "what participants will do differently",
    ),
    (
        Phase::Post,
        3,
        "Looking back at your pre-programme concerns, how do you feel now?",
        "how pre-programme concerns were addressed",
    ),
];

/// Post question 3 looks back on the concerns raised in Pre question 3.
const CONCERN_QUESTION: u8 = 3;

pub(super) fn open_questions() -> Vec<OpenQuestion> {
    OPEN.iter()
        .map(|&(phase, id, prompt_text, theme_context)| OpenQuestion {
            id: QuestionId::new(id),
            phase,
            prompt_text,
            follows_up: (phase == Phase::Post && id == CONCERN_QUESTION)
                .then_some(QuestionId::new(CONCERN_QUESTION)),
            theme_context,
        })
        .collect()
}
