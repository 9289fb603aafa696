//! Plain-text rendering of layout trees for snapshot tests.

use std::fmt::Write;

use crate::layout::LayoutResult;
use crate::segment::SegmentTree;

/// Render a layout tree as one line per result, indented two spaces per
/// depth:
///
/// ```text
/// container [0,12) 0,0 60x64
///   text [0,5) 0,0 60x20
/// ```
///
/// Each line is `kind [start,end) x,y widthxheight` with the rect relative
/// to the parent. Unpainted results get a trailing `unpainted`; grid
/// containers list their column and row sizes.
pub fn layout_to_string(root: &LayoutResult, tree: &SegmentTree) -> String {
    let mut out = String::new();
    write_result(&mut out, root, tree, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_result(out: &mut String, result: &LayoutResult, tree: &SegmentTree, depth: usize) {
    let kind = tree.kind_of(result.segment).map(|k| k.to_string()).unwrap_or_else(|| "?".into());
    let r = result.rect;
    let _ = write!(
        out,
        "{:indent$}{kind} [{},{}) {},{} {}x{}",
        "",
        result.global_start,
        result.global_end,
        r.x,
        r.y,
        r.width,
        r.height,
        indent = depth * 2
    );
    if let Some(grid) = &result.grid {
        let _ = write!(out, " columns={:?} rows={:?}", grid.column_sizes, grid.row_sizes);
    }
    if !result.painted {
        out.push_str(" unpainted");
    }
    out.push('\n');
    for child in &result.children {
        write_result(out, child, tree, depth + 1);
    }
}
