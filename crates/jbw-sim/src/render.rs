use jbw_core::Position;
use jbw_gen::{ItemCatalog, PatchMap};

/// Text picture of the square of cells within `radius` of `center`.
///
/// Each item is drawn as the first character of its type name, empty cells
/// as `.` and `agents` as `@`. The top row is the highest `y`.
pub fn ascii_map(
    map: &PatchMap,
    catalog: &ItemCatalog,
    agents: &[Position],
    center: Position,
    radius: i64,
) -> String {
    let side = (2 * radius + 1) as usize;
    let mut out = String::with_capacity(side * (side + 1));
    for y in (center.y - radius..=center.y + radius).rev() {
        for x in center.x - radius..=center.x + radius {
            let p = Position::new(x, y);
            let symbol = if agents.contains(&p) {
                '@'
            } else {
                map.item_at(p)
                    .and_then(|t| catalog.get(t))
                    .and_then(|item| item.name.chars().next())
                    .unwrap_or('.')
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
