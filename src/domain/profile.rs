use crate::error::{Result, StudioError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn default_behavior() -> u8 {
    85
}

/// What the wishing console collects about a child.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub achievements: String,
    /// 0 = naughty, 100 = angel
    #[serde(default = "default_behavior", deserialize_with = "score")]
    pub behavior: u8,
    #[serde(default)]
    pub wish_quote: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub gift_suggestion: String,
}

// The console sends the age from a text input, other clients send a number.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

// Range inputs report their value as a string, a cleared input as "".
fn score<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = string_or_number(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(default_behavior());
    }
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=255.0).contains(value))
        .map(|value| value.round() as u8)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid behavior score `{}`", raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorBand {
    Struggling,
    Trying,
    VeryGood,
    Angelic,
}

impl BehaviorBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => BehaviorBand::Struggling,
            25..=49 => BehaviorBand::Trying,
            50..=74 => BehaviorBand::VeryGood,
            _ => BehaviorBand::Angelic,
        }
    }

    /// Phrase Santa uses in the templated script.
    pub fn description(self) -> &'static str {
        match self {
            BehaviorBand::Struggling => "struggling a bit to stay on the Nice List",
            BehaviorBand::Trying => "trying your best, but sometimes forgetting to listen",
            BehaviorBand::VeryGood => "very good",
            BehaviorBand::Angelic => "extraordinarily angelic",
        }
    }

    /// Short label shown next to the console slider.
    pub fn label(self) -> &'static str {
        match self {
            BehaviorBand::Struggling => "Naughty",
            BehaviorBand::Trying => "Needs Improvement",
            BehaviorBand::VeryGood => "Good",
            BehaviorBand::Angelic => "Very Good",
        }
    }
}

impl ChildProfile {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.age.trim().is_empty() {
            return Err(StudioError::Validation(
                "Please fill in Name and Age!".to_string(),
            ));
        }
        if self.behavior > 100 {
            return Err(StudioError::Validation(format!(
                "behavior must be between 0 and 100, got {}",
                self.behavior
            )));
        }
        Ok(())
    }

    pub fn behavior_band(&self) -> BehaviorBand {
        BehaviorBand::from_score(self.behavior)
    }

    /// Prompt sent to the text generation model.
    pub fn script_prompt(&self) -> String {
        format!(
            r#"You are Santa Claus. Write a personalized video message script for a child named {name}, aged {age}.
They live in {location} and are interested in {interests}.
Their recent achievement is: {achievements}.
They have been {behavior}% good this year (0=Naughty, 100=Angel).
Their wish quote was: "{wish}".
Areas for improvement: "{improvements}".
Top gift suggestion: "{gift}".

IMPORTANT: The script should be approximately 60 seconds long when spoken (about 130-160 words).
Make it warm, magical, and engaging.
Start with a friendly greeting using their name.

Structure the response as a monologue script for Santa.
Keep it warm, magical, and specific.
Mention the behavior specifically.
Mention the gift suggestion as something the elves are working on.
End with a Merry Christmas.

CRITICAL INSTRUCTIONS:
1. Output ONLY the spoken words.
2. DO NOT include *stage directions* like (smiles), [looks at camera], or (pauses).
3. DO NOT include intro text like "Here is the script" or "Okay".
4. Start immediately with "Ho ho ho!" or "Hello".
5. The text you generate will be sent directly to a Text-to-Speech engine, so it must be clean spoken English only."#,
            name = self.name,
            age = self.age,
            location = self.location,
            interests = self.interests,
            achievements = self.achievements,
            behavior = self.behavior,
            wish = self.wish_quote,
            improvements = self.improvements,
            gift = self.gift_suggestion,
        )
    }

    /// Deterministic script used whenever the text model is not available.
    pub fn fallback_script(&self) -> String {
        let encouragement = if self.behavior > 50 {
            "Keep up the great work!"
        } else {
            "I know you can do better before Christmas Eve!"
        };
        let improvements = if self.improvements.trim().is_empty() {
            "being kind"
        } else {
            self.improvements.as_str()
        };

        format!(
            "Ho Ho Ho! Hello {name}!\n\n\
             My elves here at the North Pole have been watching you very closely. They tell me you are {age} years old now! My, how you've grown!\n\n\
             I've been checking my list, and I see you have been {behavior} this year. {encouragement}\n\n\
             I heard you whispered specifically about \"{wish}\"? Well, Mrs. Claus and I think that is a wonderful thought.\n\n\
             Now, about that {gift}... The elves in the workshop are tinkering away. We'll see what fits in the sleigh!\n\n\
             Remember to work on {improvements}.\n\n\
             Merry Christmas, {name}!",
            name = self.name,
            age = self.age,
            behavior = self.behavior_band().description(),
            encouragement = encouragement,
            wish = self.wish_quote,
            gift = self.gift_suggestion,
            improvements = improvements,
        )
    }

    /// Prompt for the video model. Santa stays silent so nobody expects lip sync.
    pub fn visual_prompt(&self) -> String {
        format!(
            "Cinematic, photorealistic video of Santa Claus in his cozy North Pole workshop. \
             He is holding a magical parchment with the name \"{}\" written on it. \
             He is smiling warmly and checking his Nice List. \
             Background includes vague shapes of toys like {}. \
             He nods approvingly (without speaking). \
             Warm fireplace lighting, 4k, magical atmosphere.",
            self.name, self.interests
        )
    }
}
