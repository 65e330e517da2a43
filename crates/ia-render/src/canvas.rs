use ia_core::pixel::AsciiArt;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Write the artifact directly into a `ratatui::Buffer`.
///
/// No Canvas widget — direct cell writes, with `(scroll_x, scroll_y)` as the
/// top-left artifact coordinate. Cells outside the artifact stay untouched
/// (terminal default background).
pub fn render_art(buf: &mut Buffer, area: Rect, art: &AsciiArt, scroll: (u16, u16)) {
    let (scroll_x, scroll_y) = (usize::from(scroll.0), usize::from(scroll.1));

    for vy in 0..area.height {
        let Some(line) = art.lines().get(scroll_y + usize::from(vy)) else {
            break;
        };
        let mut chars = line.chars().skip(scroll_x);
        for vx in 0..area.width {
            let Some(ch) = chars.next() else {
                break;
            };
            if let Some(cell) = buf.cell_mut((area.x + vx, area.y + vy)) {
                cell.set_char(ch);
            }
        }
    }
}

/// Clamp a scroll offset so the viewport never scrolls past the artifact.
#[must_use]
pub fn clamp_scroll(art: &AsciiArt, area: Rect, scroll: (u16, u16)) -> (u16, u16) {
    let max_x = art.cols().saturating_sub(usize::from(area.width));
    let max_y = art.rows().saturating_sub(usize::from(area.height));
    (
        scroll.0.min(max_x.min(usize::from(u16::MAX)) as u16),
        scroll.1.min(max_y.min(usize::from(u16::MAX)) as u16),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_visible_window_with_scroll() {
        let art = AsciiArt::new(vec!["abcd".into(), "efgh".into(), "ijkl".into()]);
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        render_art(&mut buf, area, &art, (1, 1));

        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some("f"));
        assert_eq!(buf.cell((1, 0)).map(|c| c.symbol()), Some("g"));
        assert_eq!(buf.cell((0, 1)).map(|c| c.symbol()), Some("j"));
    }

    #[test]
    fn scroll_clamps_to_artifact_bounds() {
        let art = AsciiArt::new(vec!["abcd".into(); 10]);
        let area = Rect::new(0, 0, 2, 4);
        assert_eq!(clamp_scroll(&art, area, (99, 99)), (2, 6));
        assert_eq!(clamp_scroll(&art, area, (0, 0)), (0, 0));
    }

    #[test]
    fn artifact_smaller_than_area_leaves_rest_untouched() {
        let art = AsciiArt::new(vec!["x".into()]);
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        render_art(&mut buf, area, &art, (0, 0));
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some("x"));
        assert_eq!(buf.cell((1, 1)).map(|c| c.symbol()), Some(" "));
    }
}
