use super::aggregate::CommitHistogram;
use std::collections::BTreeMap;

/// Up to seven day counts for one week of the window.
pub type WeekColumn = Vec<u64>;

/// Week columns keyed by `bucket / 7`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarGrid {
    columns: BTreeMap<usize, WeekColumn>,
}

impl CalendarGrid {
    /// Walk buckets in ascending order, opening a column at `bucket % 7 == 0`
    /// and sealing it at `bucket % 7 == 6` or when the buckets run out.
    pub fn build(histogram: &CommitHistogram) -> Self {
        let mut columns = BTreeMap::new();
        let mut current: Option<(usize, WeekColumn)> = None;

        for (bucket, count) in histogram.iter() {
            let week = bucket / 7;
            let day_in_week = bucket % 7;

            let new_week = matches!(&current, Some((w, _)) if *w != week);
            if day_in_week == 0 || new_week {
                if let Some((w, col)) = current.take() {
                    columns.insert(w, col);
                }
            }

            let (_, col) = current.get_or_insert_with(|| (week, WeekColumn::new()));
            col.push(count);

            if day_in_week == 6 {
                if let Some((w, col)) = current.take() {
                    columns.insert(w, col);
                }
            }
        }

        if let Some((w, col)) = current {
            columns.insert(w, col);
        }

        Self { columns }
    }

    pub fn column(&self, week: usize) -> Option<&WeekColumn> {
        self.columns.get(&week)
    }

    /// Count at a week/weekday slot; slots never observed read as zero.
    pub fn cell(&self, week: usize, day: usize) -> u64 {
        self.column(week)
            .and_then(|col| col.get(day))
            .copied()
            .unwrap_or(0)
    }

    pub fn weeks(&self) -> impl Iterator<Item = (usize, &WeekColumn)> + '_ {
        self.columns.iter().map(|(w, c)| (*w, c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
