//! Property tests: any sequence of cursor moves keeps the target line on screen and
//! the window contents consistent with the document.

use core_render::ViewportCoordinator;
use core_state::Viewport;
use core_terminal::GridScreen;
use core_text::{Buffer, Document};
use proptest::prelude::*;

fn numbered(n: usize) -> Buffer {
    let text = (0..n).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
    Buffer::from_text(&text)
}

proptest! {
    #[test]
    fn moved_line_is_always_visible(
        lines in 1usize..200,
        height in 1u16..30,
        targets in prop::collection::vec(0usize..400, 1..40),
    ) {
        let doc = numbered(lines);
        let mut vp = Viewport { top_line: 0, height, width: 20 };
        let mut screen = GridScreen::new(20, height + 2);
        ViewportCoordinator::new(&mut vp, &doc, &mut screen).repaint_all();
        for t in targets {
            let line = t % lines;
            let (row, _) = ViewportCoordinator::new(&mut vp, &doc, &mut screen).move_to(line, 0);
            prop_assert!(vp.contains(line));
            prop_assert!(vp.top_line < doc.line_count());
            prop_assert_eq!(usize::from(row), line - vp.top_line);
            for r in 0..height {
                let shown = screen.row_text(r);
                let l = vp.line_at(r);
                if l < doc.line_count() {
                    prop_assert_eq!(shown, doc.line(l));
                } else {
                    prop_assert_eq!(shown, "~");
                }
            }
        }
    }

    #[test]
    fn scroll_never_leaves_document(
        lines in 1usize..100,
        height in 1u16..20,
        deltas in prop::collection::vec(-50isize..50, 1..30),
    ) {
        let doc = numbered(lines);
        let mut vp = Viewport { top_line: 0, height, width: 10 };
        let mut screen = GridScreen::new(10, height + 2);
        for d in deltas {
            let before = vp.top_line as isize;
            let applied = ViewportCoordinator::new(&mut vp, &doc, &mut screen)
                .scroll_region(d, 0, height - 1);
            prop_assert_eq!(vp.top_line as isize, before + applied);
            prop_assert!(vp.top_line < lines);
            prop_assert!(applied.abs() <= d.abs());
        }
    }
}
