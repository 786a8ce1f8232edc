use super::grid::CalendarGrid;
use super::offset::Calendar;
use chrono::{Datelike, Duration};
use console::Style;
use std::io::{self, Write};

const GUTTER_WIDTH: usize = 5;
const CELL_WIDTH: usize = 4;

/// Visual intensity class of one heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTier {
    Empty,
    Low,
    Medium,
    High,
    Today,
}

impl CellTier {
    pub fn for_count(count: u64, is_today: bool) -> Self {
        if is_today {
            return CellTier::Today;
        }
        match count {
            0 => CellTier::Empty,
            1..=4 => CellTier::Low,
            5..=9 => CellTier::Medium,
            _ => CellTier::High,
        }
    }
}

/// Maps tiers to terminal styles.
#[derive(Debug, Clone)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn style(&self, tier: CellTier) -> Style {
        let style = match tier {
            CellTier::Empty => Style::new().black(),
            CellTier::Low => Style::new().black().on_white().bold(),
            CellTier::Medium => Style::new().black().on_yellow().bold(),
            CellTier::High => Style::new().black().on_green().bold(),
            CellTier::Today => Style::new().white().on_magenta().bold(),
        };
        style.force_styling(self.colored)
    }
}

/// Fixed-width text for a cell: a dash for zero, the count right-aligned otherwise.
pub fn cell_text(count: u64) -> String {
    if count == 0 {
        format!("{:>w$} ", "-", w = CELL_WIDTH - 1)
    } else {
        format!("{:>w$} ", count, w = CELL_WIDTH - 1)
    }
}

/// Weekday label gutter; rows are indexed Sunday = 0 .. Saturday = 6.
pub fn day_label(row: usize) -> &'static str {
    match row {
        1 => " Mon ",
        3 => " Wed ",
        5 => " Fri ",
        _ => "     ",
    }
}

pub struct HeatmapRenderer<'a> {
    calendar: &'a Calendar,
    palette: Palette,
}

impl<'a> HeatmapRenderer<'a> {
    pub fn new(calendar: &'a Calendar, palette: Palette) -> Self {
        Self { calendar, palette }
    }

    /// Leftmost (oldest) week column index; today's week is column 0.
    pub fn oldest_week(&self) -> usize {
        self.calendar.window_days() as usize / 7 + 1
    }

    /// Row holding today's cell in week 0.
    pub fn today_row(&self) -> usize {
        self.calendar.alignment_offset() as usize - 1
    }

    pub fn tier_at(&self, grid: &CalendarGrid, week: usize, row: usize) -> CellTier {
        let is_today = week == 0 && row == self.today_row();
        CellTier::for_count(grid.cell(week, row), is_today)
    }

    /// Month labels, one slot per week stepping forward from the window start.
    /// A label appears only where the month changes.
    pub fn month_header(&self) -> String {
        let today = self.calendar.start_of_today();
        let mut week = self.calendar.window_start();
        let mut month = week.month();
        let mut out = " ".repeat(GUTTER_WIDTH + CELL_WIDTH);

        loop {
            if week.month() != month {
                out.push_str(&format!("{} ", week.format("%b")));
                month = week.month();
            } else {
                out.push_str(&" ".repeat(CELL_WIDTH));
            }

            week += Duration::days(7);
            if week > today {
                break;
            }
        }
        out
    }

    /// Header plus seven rows, Saturday on top, oldest week on the left.
    pub fn render<W: Write>(&self, grid: &CalendarGrid, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.month_header())?;

        for row in (0..7).rev() {
            write!(out, "{}", day_label(row))?;
            for week in (0..=self.oldest_week()).rev() {
                let count = grid.cell(week, row);
                let tier = self.tier_at(grid, week, row);
                write!(out, "{}", self.palette.style(tier).apply_to(cell_text(count)))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
