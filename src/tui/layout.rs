use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions of the timeline browser
pub struct AppLayout {
    pub namespace_area: Rect,
    pub date_area: Rect,
    pub filter_area: Rect,
    pub timeline_area: Rect,
    pub detail_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Input row on top (namespace, date, filter), timeline 60% / detail 40%
    /// in the middle, one-row status bar at the bottom
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Length(18), Constraint::Min(10)])
            .split(rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        Self {
            namespace_area: inputs[0],
            date_area: inputs[1],
            filter_area: inputs[2],
            timeline_area: body[0],
            detail_area: body[1],
            status_area: rows[2],
        }
    }
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));

        assert_eq!(layout.namespace_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.timeline_area.height, 26);
        assert_eq!(layout.timeline_area.width, 60);
        assert_eq!(layout.detail_area.width, 40);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let modal = centered_rect(80, 80, area);
        assert_eq!(modal.width, 80);
        assert_eq!(modal.height, 32);
        assert_eq!(modal.x, 10);
        assert_eq!(modal.y, 4);
    }
}
