use super::itinerary::{Meal, NormalizedDay, ScheduleEntry};

/// Sort key for entries whose display time could not be parsed; keeps
/// them after every parseable entry while the stable sort preserves
/// their original order.
pub const UNPARSED_TIME: u32 = u32::MAX;

const AFTERNOON_HINTS: [&str; 8] = [
    "下午", "晚上", "傍晚", "晚间", "夜", "pm", "afternoon", "evening",
];

/// Best-effort parse of a display-time string into minutes since
/// midnight, for ordering only. Never fails; malformed input just
/// degrades to [`UNPARSED_TIME`].
///
/// Strategy: take the segment before any `-` range separator, look for
/// an `HH:MM` pattern, fall back to a bare hour digit, and shift by 12
/// hours when the surrounding text carries an afternoon/evening hint
/// and the hour is still on the 12-hour clock.
pub fn time_sort_key(text: &str) -> u32 {
    let leading = text.split('-').next().unwrap_or(text);
    let is_afternoon = {
        let lower = text.to_lowercase();
        AFTERNOON_HINTS.iter().any(|hint| lower.contains(hint))
    };

    if let Some((hour, minute)) = find_hour_minute(leading) {
        return adjust(hour, minute, is_afternoon);
    }
    if let Some(hour) = find_bare_hour(leading) {
        return adjust(hour, 0, is_afternoon);
    }
    UNPARSED_TIME
}

fn adjust(hour: u32, minute: u32, is_afternoon: bool) -> u32 {
    let hour = if is_afternoon && (1..12).contains(&hour) {
        hour + 12
    } else {
        hour
    };
    hour.min(23) * 60 + minute.min(59)
}

/// First `H:MM` / `HH:MM` pattern in the text (':' or '：').
fn find_hour_minute(text: &str) -> Option<(u32, u32)> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let hour: u32 = chars[start..i].iter().collect::<String>().parse().ok()?;
            if i < chars.len() && (chars[i] == ':' || chars[i] == '：') && hour <= 24 {
                let m_start = i + 1;
                let mut j = m_start;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
                if j > m_start {
                    let minute: u32 =
                        chars[m_start..j].iter().collect::<String>().parse().ok()?;
                    return Some((hour, minute));
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

/// First numeric run that plausibly reads as an hour.
fn find_bare_hour(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let hour: u32 = digits.parse().ok()?;
    (hour <= 24).then_some(hour)
}

/// One slot of the merged chronological view of a day.
#[derive(Debug, Clone)]
pub enum TimelineItem {
    Activity(ScheduleEntry),
    Meal(Meal),
}

impl TimelineItem {
    pub fn time(&self) -> &str {
        match self {
            TimelineItem::Activity(entry) => &entry.time,
            TimelineItem::Meal(meal) => &meal.time,
        }
    }
}

/// Merge a day's schedule entries and meals into one timeline, ordered
/// by parsed display time. Unparseable times sort last, stable by
/// original position.
pub fn merge_timeline(day: &NormalizedDay) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = day
        .schedule
        .iter()
        .cloned()
        .map(TimelineItem::Activity)
        .chain(day.meals.iter().cloned().map(TimelineItem::Meal))
        .collect();
    items.sort_by_key(|item| time_sort_key(item.time()));
    items
}
