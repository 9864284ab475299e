//! Option catalogs, field names and limits shared across the forms.

use crate::options::OptionSpec;

/// Max length for first/last name, city and emergency contact name.
pub const MAX_NAME_LEN: usize = 100;

/// Max length for the street address.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Max length for free-text notes.
pub const MAX_NOTE_LEN: usize = 255;

pub const STRESS_LEVEL_MIN: u8 = 1;
pub const STRESS_LEVEL_MAX: u8 = 10;

/// Checkbox group prefixes used by the intake form.
pub const STYLES_GROUP: &str = "styles";
pub const GOALS_GROUP: &str = "goals";
pub const INTERESTS_GROUP: &str = "interests";
pub const PHYSICAL_HISTORY_GROUP: &str = "physicalHistory";

pub const YOGA_STYLES: &[OptionSpec] = &[
    OptionSpec::label("Hatha"),
    OptionSpec::label("Ashtanga"),
    OptionSpec::label("Vinyasa/Flow"),
    OptionSpec::label("Iyengar"),
    OptionSpec::label("Power"),
    OptionSpec::label("Anusara"),
    OptionSpec::label("Bikram/Hot"),
    OptionSpec::label("Forrest"),
    OptionSpec::label("Kundalini"),
    OptionSpec::label("Gentle"),
    OptionSpec::label("Restorative"),
    OptionSpec::label("Yin"),
];

pub const YOGA_GOALS: &[OptionSpec] = &[
    OptionSpec::label("Improve fitness"),
    OptionSpec::label("Increase well-being"),
    OptionSpec::label("Injury rehabilitation"),
    OptionSpec::label("Positive reinforcement"),
    OptionSpec::label("Strength training"),
    OptionSpec::label("Weight management"),
    OptionSpec::label("Other"),
];

pub const YOGA_INTERESTS: &[OptionSpec] = &[
    OptionSpec::label("Asana (postures)"),
    OptionSpec::label("Pranayama (breath work)"),
    OptionSpec::label("Meditation"),
    OptionSpec::label("Yoga Philosophy"),
    OptionSpec::label("Eastern energy systems"),
    OptionSpec::label("Other"),
];

/// Physical history conditions. The keys are the complete set of health-history flags the
/// backend expects.
pub const PHYSICAL_HISTORY: &[OptionSpec] = &[
    OptionSpec::keyed("Broken/Dislocated bones", "brokenBones"),
    OptionSpec::keyed("Muscle strain/sprain", "muscleStrain"),
    OptionSpec::keyed("Arthritis/Bursitis", "arthritisBursitis"),
    OptionSpec::keyed("Disc problems", "discProblems"),
    OptionSpec::keyed("Scoliosis", "scoliosis"),
    OptionSpec::keyed("Back problems", "backProblems"),
    OptionSpec::keyed("Osteoporosis", "osteoporosis"),
    OptionSpec::keyed("Diabetes (type 1 or 2)", "diabetes"),
    OptionSpec::keyed("High/Low blood pressure", "bloodPressure"),
    OptionSpec::keyed("Insomnia", "insomnia"),
    OptionSpec::keyed("Anxiety/Depression", "anxietyDepression"),
    OptionSpec::keyed("Asthma / Short breath", "asthma"),
    OptionSpec::keyed("Numbness / Tingling", "numbnessTingling"),
    OptionSpec::keyed("Cancer", "cancer"),
    OptionSpec::keyed("Seizures", "seizures"),
    OptionSpec::keyed("Stroke", "stroke"),
    OptionSpec::keyed("Heart conditions / Chest pain", "heartConditions"),
    OptionSpec::keyed("Pregnancy", "pregnancy"),
    OptionSpec::keyed("Auto-immune condition", "autoimmune"),
    OptionSpec::keyed("Surgery", "surgery"),
    OptionSpec::keyed("Medications", "medications"),
];

/// Health-history key that is also implied by a non-blank medication list.
pub const MEDICATIONS_KEY: &str = "medications";

pub const ACTIVITY_LEVELS: &[&str] = &[
    "Sedentary/Very inactive",
    "Somewhat inactive",
    "Average",
    "Somewhat active",
    "Extremely active",
];

pub const PRACTICE_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];

/// Activity levels offered on the SOAP note.
pub const SOAP_ACTIVITY_LEVELS: &[&str] = &["HIGH", "MEDIUM", "LOW"];

/// Self-assessment checkbox groups: `(prefix, title, options)`.
pub const SELF_ASSESSMENT_GROUPS: &[(&str, &str, &[OptionSpec])] = &[
    ("koshas", "Koshas", KOSHAS),
    ("asana", "Asana", ASANA),
    ("mindfulness", "Mindfulness", MINDFULNESS),
    ("kleshas", "Kleshas", KLESHAS),
    ("chakras", "Chakras", CHAKRAS),
    ("pranayama", "Pranayama", PRANAYAMA),
];

pub const KOSHAS: &[OptionSpec] = &[
    OptionSpec::label("Physical"),
    OptionSpec::label("Intellectual"),
    OptionSpec::label("Emotional"),
    OptionSpec::label("Spiritual"),
];

pub const ASANA: &[OptionSpec] = &[
    OptionSpec::label("Sun A"),
    OptionSpec::label("Sun B"),
    OptionSpec::label("Seated"),
    OptionSpec::label("Standing"),
    OptionSpec::label("Prone"),
    OptionSpec::label("Supine"),
    OptionSpec::label("Balance"),
    OptionSpec::label("Revolved"),
    OptionSpec::label("Backbends"),
    OptionSpec::label("Inversion"),
];

pub const MINDFULNESS: &[OptionSpec] = &[
    OptionSpec::label("Guided Visualization"),
    OptionSpec::label("Breath-centered"),
    OptionSpec::label("Internal Observation"),
    OptionSpec::label("External Observation"),
    OptionSpec::label("Non-judgement"),
    OptionSpec::label("Other"),
];

pub const KLESHAS: &[OptionSpec] = &[
    OptionSpec::label("Ignorance"),
    OptionSpec::label("Egoism"),
    OptionSpec::label("Attachment"),
    OptionSpec::label("Aversion"),
    OptionSpec::label("Fear of Loss"),
];

pub const CHAKRAS: &[OptionSpec] = &[
    OptionSpec::label("Root"),
    OptionSpec::label("Sacral"),
    OptionSpec::label("Solar Plexus"),
    OptionSpec::label("Heart"),
    OptionSpec::label("Throat"),
    OptionSpec::label("Third-Eye"),
    OptionSpec::label("Crown"),
];

pub const PRANAYAMA: &[OptionSpec] = &[
    OptionSpec::label("Diaphragmatic"),
    OptionSpec::label("Three-Part"),
    OptionSpec::label("Retention"),
    OptionSpec::label("Suspension"),
    OptionSpec::label("Victorious"),
    OptionSpec::label("Alternate Nostril"),
    OptionSpec::label("Other"),
];

/// Reflection prompts on the self-assessment, answered in fields `q0`..`q7`.
pub const SELF_ASSESSMENT_QUESTIONS: &[&str] = &[
    "How did the client(s) react to the tools presented?",
    "How did the client(s) react to you?",
    "How did you respond to the client(s)?",
    "What adaptations and/or modifications did you utilize?",
    "What are the next steps for the client(s) work with you (based on direct feedback and your observations)?",
    "What were your biggest wins of this session?",
    "What were your biggest lessons learned?",
    "What, if any, guidance do you need from your mentor?",
];

/// The 50 US states as `(code, name)`.
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];
