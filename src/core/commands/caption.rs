//! Caption and label placement

use tracing::debug;

use crate::core::model::{Range, TableSnapshot};
use crate::core::options::EditOptions;
use crate::utils::changes::{ChangeSet, ChangeSpec};
use crate::utils::lines::{
    ensure_empty_line, gobble_empty_lines, whole_line_extent, Direction, EmptyLineInsertion,
};

/// Move the caption (and a free-standing label) above or below the tabular
///
/// A table without a caption gets the default one. A lone label is carried
/// along under the new caption instead of being left behind.
pub fn move_caption(
    snapshot: &TableSnapshot<'_>,
    target: Direction,
    options: &EditOptions,
) -> ChangeSet {
    let doc = snapshot.doc;
    let tabular = snapshot.positions.tabular;
    let caption = snapshot.caption();
    let label = snapshot.label();

    if let Some(caption) = caption {
        let in_place = match target {
            Direction::Above => caption.from < tabular.from,
            Direction::Below => caption.from > tabular.to,
        };
        if in_place {
            debug!(?target, "caption already in place");
            return ChangeSet::new();
        }
    }

    let position = match target {
        Direction::Above => tabular.from,
        Direction::Below => tabular.to,
    };
    let EmptyLineInsertion {
        pos,
        prefix,
        suffix,
    } = ensure_empty_line(doc, position, target);
    let destination = gobble_empty_lines(doc, pos, options.blank_lines_to_consume, target);

    let mut moved = Vec::with_capacity(2);
    let block = match caption {
        None => {
            let label_text = match label {
                Some(label) => {
                    moved.push(label);
                    snapshot.slice(label)
                }
                None => options.default_label.as_str(),
            };
            format!("{}\n{}", options.default_caption, label_text)
        }
        Some(caption) => {
            let mut block = snapshot.slice(caption).to_string();
            if let Some(label) = label.filter(|label| !caption.contains(label)) {
                block.push('\n');
                block.push_str(snapshot.slice(label));
                moved.push(label);
            }
            moved.push(caption);
            block
        }
    };

    let mut changes = ChangeSet::new();
    let mut anchored = false;
    for span in moved {
        let extent = whole_line_extent(doc, span);
        if !clashes(extent, destination) {
            changes.push(ChangeSpec::delete(extent));
        } else if !anchored {
            // The moved line already borders the tabular: rewrite it in place
            changes.push(ChangeSpec::replace(span, block.clone()));
            anchored = true;
        } else {
            changes.push(ChangeSpec::delete(span));
        }
    }
    if !anchored {
        changes.push(ChangeSpec::replace(
            destination,
            format!("{}{}{}", prefix, block, suffix),
        ));
    }
    changes
}

/// Delete the caption, and the label unless it sits inside the caption
pub fn remove_caption(snapshot: &TableSnapshot<'_>) -> ChangeSet {
    let caption = snapshot.caption();
    let label = snapshot
        .label()
        .filter(|label| !caption.is_some_and(|caption| caption.contains(label)));

    let changes: ChangeSet = caption
        .into_iter()
        .chain(label)
        .map(|span| ChangeSpec::delete(whole_line_extent(snapshot.doc, span)))
        .collect();
    if changes.is_empty() {
        debug!("no caption or label to remove");
    }
    changes
}

/// Whether deleting `extent` would swallow the insertion point `destination`
fn clashes(extent: Range, destination: Range) -> bool {
    if destination.is_empty() {
        extent.from < destination.from && destination.from < extent.to
    } else {
        extent.from < destination.to && destination.from < extent.to
    }
}
