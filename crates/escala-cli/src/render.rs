//! Plain-text rendering of schedules, calendars and configs for the
//! terminal.

use escala_core::{
  calendar::MonthGrid,
  config::ScheduleConfig,
  event::{EventKind, ExceptionEvent, ScheduleEvent},
  weekday::Weekday,
};

const MONTH_NAMES: [&str; 12] = [
  "JANEIRO", "FEVEREIRO", "MARÇO", "ABRIL", "MAIO", "JUNHO", "JULHO", "AGOSTO", "SETEMBRO",
  "OUTUBRO", "NOVEMBRO", "DEZEMBRO",
];

pub fn month_name(month: u32) -> &'static str {
  month
    .checked_sub(1)
    .and_then(|i| MONTH_NAMES.get(i as usize))
    .copied()
    .unwrap_or("?")
}

fn kind_suffix(kind: EventKind, note: Option<&str>) -> String {
  let mut out = String::new();
  if kind == EventKind::Extra {
    out.push_str("  [extra]");
  }
  if let Some(note) = note {
    out.push_str(&format!("  ({note})"));
  }
  out
}

/// One line per event: date, weekday code and ministry.
pub fn schedule(events: &[ScheduleEvent]) -> String {
  events
    .iter()
    .map(|event| {
      format!(
        "{}  {}  {}{}\n",
        event.date,
        event.weekday.map_or("---", Weekday::code),
        event.ministry_name,
        kind_suffix(event.kind, event.note.as_deref())
      )
    })
    .collect()
}

pub fn exceptions(exceptions: &[ExceptionEvent]) -> String {
  exceptions
    .iter()
    .map(|exception| {
      format!(
        "{}  {}{}\n",
        exception.date,
        exception.ministry_name,
        kind_suffix(exception.kind, exception.note.as_deref())
      )
    })
    .collect()
}

/// A Sunday-first grid of day numbers, followed by the month's events.
pub fn calendar(grid: &MonthGrid) -> String {
  let header: Vec<&str> = Weekday::ALL.iter().map(|d| d.code()).collect();
  let mut out = format!("{} {}\n{}\n", month_name(grid.month), grid.year, header.join(" "));

  for week in &grid.weeks {
    let row: Vec<String> = week
      .iter()
      .map(|cell| match (cell.day, &cell.event) {
        (Some(day), Some(_)) => format!("{day:>2}*"),
        (Some(day), None) => format!("{day:>2} "),
        (None, _) => "   ".to_owned(),
      })
      .collect();
    out.push_str(row.join(" ").trim_end());
    out.push('\n');
  }

  let events: Vec<ScheduleEvent> = grid
    .weeks
    .iter()
    .flatten()
    .filter_map(|cell| cell.event.clone())
    .collect();
  if !events.is_empty() {
    out.push('\n');
    out.push_str(&schedule(&events));
  }
  out
}

pub fn config(config: &ScheduleConfig) -> String {
  let weekdays: Vec<&str> = config.active_weekdays.iter().map(|d| d.code()).collect();
  let mut out = format!(
    "year:          {}\nweekdays:      {}\nfifth sunday:  {}\nministries:\n",
    config.year,
    weekdays.join(" "),
    config.fifth_sunday().unwrap_or("(off)")
  );
  for (position, ministry) in config.ministries.iter().enumerate() {
    out.push_str(&format!("  {}. {}  {}\n", position + 1, ministry.name, ministry.id));
  }
  out
}
