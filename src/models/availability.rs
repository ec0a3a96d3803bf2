use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaySlots {
    pub day: String,
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityTable {
    pub days: Vec<DaySlots>,
}

impl AvailabilityTable {
    pub fn reference() -> Self {
        let day = |day: &str, slots: [&str; 2]| DaySlots {
            day: day.to_string(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            days: vec![
                day("monday", ["2:00 PM", "3:30 PM"]),
                day("tuesday", ["2:00 PM", "3:30 PM"]),
                day("wednesday", ["2:30 PM", "4:00 PM"]),
                day("thursday", ["2:00 PM", "3:30 PM"]),
                day("friday", ["2:30 PM", "3:00 PM"]),
            ],
        }
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let mut table: AvailabilityTable = serde_json::from_str(s)?;
        for entry in &mut table.days {
            entry.day = parse_weekday(&entry.day)?;
            if entry.slots.is_empty() {
                anyhow::bail!("no time slots for {}", entry.day);
            }
            if entry.slots.iter().any(|slot| slot.trim().is_empty()) {
                anyhow::bail!("empty time slot for {}", entry.day);
            }
        }
        Ok(table)
    }

    pub fn slots_for(&self, day: &str) -> Option<&[String]> {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.slots.as_slice())
    }

    pub fn mentioned_days(&self, text: &str) -> Vec<&str> {
        let lc = text.to_lowercase();
        self.days
            .iter()
            .filter(|d| lc.contains(d.day.as_str()))
            .map(|d| d.day.as_str())
            .collect()
    }

    pub fn describe_days(&self, days: &[&str]) -> String {
        days.iter()
            .filter_map(|day| {
                self.slots_for(day)
                    .map(|slots| format!("{} at {}", capitalize(day), slots.join(" and ")))
            })
            .collect::<Vec<_>>()
            .join(", or ")
    }

    pub fn to_prompt_lines(&self) -> String {
        self.days
            .iter()
            .map(|d| format!("- {}s: {}", capitalize(&d.day), d.slots.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for AvailabilityTable {
    fn default() -> Self {
        Self::reference()
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

fn parse_weekday(s: &str) -> anyhow::Result<String> {
    let day = s.trim().to_lowercase();
    if WEEKDAYS.contains(&day.as_str()) {
        Ok(day)
    } else {
        Err(anyhow::anyhow!("invalid weekday: {s}"))
    }
}
