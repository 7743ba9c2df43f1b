//! Client-side paging and the track table

use std::ops::Range;
use viv_core::types::{Track, TrackField, RATING_UNRATED};

/// Tracks per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Leading columns that stay in view while scrolling horizontally (Index, Title)
pub const DEFAULT_STICKY_COLUMNS: usize = 2;

/// Splits an in-memory collection into fixed-size pages
///
/// Every page holds `page_size` items except possibly the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: usize,
    page_size: usize,
}

impl Paginator {
    /// Pager over `total` items; a zero page size is treated as one
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total / page_size)`
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Item range of page `index`, `None` past the last page
    pub fn page_range(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.page_count() {
            return None;
        }
        let start = index * self.page_size;
        Some(start..(start + self.page_size).min(self.total))
    }

    /// Slice of `items` shown on page `index`
    pub fn page<'a, T>(&self, items: &'a [T], index: usize) -> Option<&'a [T]> {
        self.page_range(index).and_then(|range| items.get(range))
    }
}

/// Column layout of the track table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    columns: Vec<TrackField>,
    sticky: usize,
    scroll: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

impl TableView {
    /// Every column in declared order with the default pinned columns
    pub fn new() -> Self {
        Self {
            columns: TrackField::ALL.to_vec(),
            sticky: DEFAULT_STICKY_COLUMNS,
            scroll: 0,
        }
    }

    /// Pin the first `sticky` columns
    #[must_use]
    pub fn with_sticky(mut self, sticky: usize) -> Self {
        self.sticky = sticky.min(self.columns.len());
        self.scroll = self.scroll.min(self.max_scroll());
        self
    }

    pub fn columns(&self) -> &[TrackField] {
        &self.columns
    }

    pub fn sticky_columns(&self) -> &[TrackField] {
        &self.columns[..self.sticky]
    }

    /// Number of scrollable columns hidden on the left
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll the non-pinned columns, clamped to the last column
    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll = offset.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.columns.len().saturating_sub(self.sticky + 1)
    }

    /// Columns shown when at most `width` columns fit: pinned first, then the
    /// scrolled window of the rest
    pub fn visible_columns(&self, width: usize) -> Vec<TrackField> {
        let pinned = self.sticky.min(width);
        self.columns[..pinned]
            .iter()
            .chain(
                self.columns[self.sticky..]
                    .iter()
                    .skip(self.scroll)
                    .take(width - pinned),
            )
            .copied()
            .collect()
    }

    /// Display text of one cell
    pub fn cell(track: &Track, field: TrackField) -> String {
        match field {
            TrackField::Rating if track.rating == RATING_UNRATED => "-".to_string(),
            _ => track.value(field).to_string(),
        }
    }

    /// Render rows as a plain-text grid, at most `width` columns wide
    pub fn render(&self, tracks: &[Track], width: usize) -> String {
        let columns = self.visible_columns(width);

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(tracks.len() + 1);
        grid.push(columns.iter().map(|field| field.label().to_string()).collect());
        for track in tracks {
            grid.push(columns.iter().map(|field| Self::cell(track, *field)).collect());
        }

        let widths: Vec<usize> = (0..columns.len())
            .map(|i| grid.iter().map(|row| row[i].chars().count()).max().unwrap_or(0))
            .collect();

        let render_row = |row: &[String]| {
            row.iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    // Marks the edge of the pinned columns
                    let pinned_edge =
                        i + 1 == self.sticky.min(columns.len()) && i + 1 < columns.len();
                    let separator = if pinned_edge { " ||" } else { "" };
                    format!("{:<width$}{}", cell, separator, width = *width)
                })
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(grid.len() + 1);
        lines.push(render_row(grid[0].as_slice()));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        lines.extend(grid[1..].iter().map(|row| render_row(row.as_slice())));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Paginator::new(0, 10).page_count(), 0);
        assert_eq!(Paginator::new(10, 10).page_count(), 1);
        assert_eq!(Paginator::new(11, 10).page_count(), 2);
        assert_eq!(Paginator::new(95, 10).page_count(), 10);
    }

    #[test]
    fn pages_have_fixed_size_except_last() {
        let pager = Paginator::new(23, DEFAULT_PAGE_SIZE);

        assert_eq!(pager.page_range(0), Some(0..10));
        assert_eq!(pager.page_range(1), Some(10..20));
        assert_eq!(pager.page_range(2), Some(20..23));
        assert_eq!(pager.page_range(3), None);
    }

    #[test]
    fn page_slices_items() {
        let items: Vec<_> = (0..12).collect();
        let pager = Paginator::new(items.len(), 5);

        assert_eq!(pager.page(&items, 2), Some(&items[10..12]));
        assert_eq!(pager.page(&items, 3), None);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let pager = Paginator::new(3, 0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.page_count(), 3);
    }

    #[test]
    fn sticky_columns_stay_visible_when_scrolled() {
        let mut table = TableView::new();
        assert_eq!(
            table.sticky_columns(),
            &[TrackField::Idx, TrackField::Title]
        );

        table.scroll_to(3);
        let visible = table.visible_columns(4);
        assert_eq!(
            visible,
            vec![
                TrackField::Idx,
                TrackField::Title,
                TrackField::Class,
                TrackField::Acousticness
            ]
        );
    }

    #[test]
    fn sticky_count_is_configurable() {
        let table = TableView::new().with_sticky(1);
        assert_eq!(table.sticky_columns(), &[TrackField::Idx]);
        assert_eq!(
            table.visible_columns(3),
            vec![TrackField::Idx, TrackField::Title, TrackField::Rating]
        );

        let table = TableView::new().with_sticky(1_000);
        assert_eq!(table.sticky_columns().len(), TrackField::ALL.len());
    }

    #[test]
    fn scroll_is_clamped_to_last_column() {
        let mut table = TableView::new();
        table.scroll_to(1_000);

        let visible = table.visible_columns(5);
        assert_eq!(visible.len(), 3);
        assert_eq!(visible.last(), Some(&TrackField::Valence));
    }

    #[test]
    fn unrated_tracks_show_a_dash() {
        let mut track = Track::unrated(0, "a", "3AM");
        assert_eq!(TableView::cell(&track, TrackField::Rating), "-");

        track.rating = 4;
        assert_eq!(TableView::cell(&track, TrackField::Rating), "4");
    }

    #[test]
    fn renders_header_separator_and_rows() {
        let table = TableView::new();
        let tracks = vec![Track::unrated(0, "a", "3AM"), Track::unrated(1, "b", "4 Walls")];

        let text = table.render(&tracks, 3);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Index | Title   || | Rating");
        assert!(lines[1].starts_with("-----"));
        assert_eq!(lines[2], "0     | 3AM     || | -");
        assert_eq!(lines[3], "1     | 4 Walls || | -");
    }
}
