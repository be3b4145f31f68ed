//! Visual construction of the header and of each visible row.
//!
//! Materializers only create and place elements. Which element does what on
//! interaction is recorded by the screen from the handles returned here.

use crate::config::layout::LayoutConfig;
use crate::domain::error::Result;
use crate::domain::row::{RowDescriptor, RowKind};
use crate::ui::anchor::{AnchorSpec, LayoutPass, Placement};
use crate::ui::element::{ElementFactory, ElementId};

/// Gap between a right-aligned control and the edge it is pinned to.
pub const EDGE_MARGIN: f64 = 20.0;

/// Left-aligned, vertically centred on `y`.
const LEFT_CENTER: (f64, f64) = (0.0, 0.5);

/// Handles of the header chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderVisuals {
    pub tile: ElementId,
    pub title: ElementId,
    pub done_label: ElementId,
    /// Transparent click target laid over the done label.
    pub done_button: ElementId,
}

/// Handles of one visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowVisuals {
    pub tile: ElementId,
    pub label: ElementId,
    /// The toggle of a bool row, or the overlay of a link row.
    pub control: ElementId,
}

/// Sets the background and creates the header tile, title and done control.
///
/// Every created handle is appended to `created` as soon as it exists, so a
/// caller can release a partially built header. The done label is right-aligned against `done.x` using its measured
/// width. Its overlay takes the label's resolved x and width and spans the
/// full header height.
///
/// # Errors
///
/// Propagates factory errors for handles it just created, which only a
/// misbehaving factory produces.
pub fn materialize_header(
    layout: &LayoutConfig,
    factory: &mut dyn ElementFactory,
    pass: &mut LayoutPass,
    created: &mut Vec<ElementId>,
) -> Result<HeaderVisuals> {
    factory.set_background(layout.background_color);

    let tile = factory.create_tile(
        0.0,
        0.0,
        layout.header.width,
        layout.header.height,
        &layout.images.row,
    );
    created.push(tile);

    let title = factory.create_label(
        layout.text.x,
        layout.text.y,
        &layout.font,
        &layout.title,
        layout.font_size,
    );
    created.push(title);
    factory.set_origin(title, LEFT_CENTER.0, LEFT_CENTER.1)?;

    let done_label =
        factory.create_label(0.0, 0.0, &layout.font, &layout.close_label, layout.font_size);
    created.push(done_label);
    factory.set_tint(done_label, layout.link_tint)?;
    factory.set_origin(done_label, LEFT_CENTER.0, LEFT_CENTER.1)?;
    pass.place(
        done_label,
        Placement::at(AnchorSpec::right_aligned(layout.done.x, EDGE_MARGIN), layout.done.y),
    );

    let done_button = factory.create_button(0.0, 0.0, &layout.images.transparent);
    created.push(done_button);
    pass.place(
        done_button,
        Placement::at(AnchorSpec::linked(done_label, |label| label.x), 0.0)
            .with_width(AnchorSpec::linked(done_label, |label| label.width))
            .with_height(layout.header.height),
    );

    Ok(HeaderVisuals {
        tile,
        title,
        done_label,
        done_button,
    })
}

/// Creates the tile, label and control of a visible row.
///
/// `switch_on` selects the toggle's initial image and is ignored for link
/// rows. Created handles are appended to `created` as they appear.
///
/// # Errors
///
/// Propagates factory errors for handles it just created.
pub fn materialize_row(
    layout: &LayoutConfig,
    row: &RowDescriptor,
    multiplier: f64,
    switch_on: bool,
    factory: &mut dyn ElementFactory,
    pass: &mut LayoutPass,
    created: &mut Vec<ElementId>,
) -> Result<RowVisuals> {
    let top = layout.row.top(multiplier);
    let center = layout.row.center(multiplier);

    let tile = factory.create_tile(
        layout.row.x,
        top,
        layout.row.width,
        layout.header.height,
        &layout.images.row,
    );
    created.push(tile);

    let label = factory.create_label(
        layout.row.text_x,
        center,
        &layout.font,
        &row.text,
        layout.font_size,
    );
    created.push(label);
    factory.set_origin(label, LEFT_CENTER.0, LEFT_CENTER.1)?;

    let control = match row.kind {
        RowKind::Bool => {
            let image = if switch_on {
                &layout.images.switch_on
            } else {
                &layout.images.switch_off
            };
            let toggle = factory.create_button(0.0, center, image);
            created.push(toggle);
            factory.set_origin(toggle, LEFT_CENTER.0, LEFT_CENTER.1)?;
            pass.place(
                toggle,
                Placement::at(AnchorSpec::right_aligned(layout.width, EDGE_MARGIN), center),
            );
            toggle
        }
        RowKind::Link => {
            factory.set_tint(label, layout.link_tint)?;
            let overlay = factory.create_button(0.0, 0.0, &layout.images.transparent);
            created.push(overlay);
            factory.set_origin(overlay, LEFT_CENTER.0, LEFT_CENTER.1)?;
            pass.place(
                overlay,
                Placement::at(
                    AnchorSpec::linked(label, |g| g.x),
                    AnchorSpec::linked(label, |g| g.y),
                )
                .with_width(AnchorSpec::linked(label, |g| g.width))
                .with_height(AnchorSpec::linked(label, |g| g.height)),
            );
            overlay
        }
    };

    tracing::debug!(
        row = row.ordinal,
        kind = %row.kind,
        multiplier,
        y = top,
        "row materialized"
    );

    Ok(RowVisuals {
        tile,
        label,
        control,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PanelOptions, Viewport};
    use crate::ui::recording::{ElementKind, RecordingFactory};

    fn layout() -> LayoutConfig {
        // 400 × 500: common height 50, font size 25
        LayoutConfig::resolve(&PanelOptions::with_schema("settings"), &Viewport::new(400.0, 500.0, 1.0))
            .unwrap()
    }

    fn row(kind: RowKind, text: &str) -> RowDescriptor {
        RowDescriptor {
            ordinal: 0,
            kind,
            text: text.to_string(),
            property: (kind == RowKind::Bool).then(|| "audio.music".to_string()),
            action: None,
            rule: None,
        }
    }

    #[test]
    fn header_done_control_is_right_aligned() {
        let layout = layout();
        let mut factory = RecordingFactory::new();
        let mut pass = LayoutPass::new();
        let mut created = Vec::new();
        let header = materialize_header(&layout, &mut factory, &mut pass, &mut created).unwrap();
        pass.resolve_all(&mut factory).unwrap();

        assert_eq!(factory.background(), Some(layout.background_color));
        assert_eq!(
            created,
            vec![header.tile, header.title, header.done_label, header.done_button]
        );
        assert_eq!(factory.element(header.title).unwrap().origin, (0.0, 0.5));

        // "Done" at size 25 measures 4 × 12.5 = 50
        let label = factory.element(header.done_label).unwrap();
        assert_eq!(label.geometry.x, 400.0 - 50.0 - EDGE_MARGIN);
        assert_eq!(label.tint, Some(layout.link_tint));

        let button = factory.geometry(header.done_button).unwrap();
        assert_eq!(button.x, label.geometry.x);
        assert_eq!(button.width, 50.0);
        assert_eq!(button.height, layout.header.height);
    }

    #[test]
    fn bool_row_pins_toggle_to_right_edge() {
        let layout = layout();
        let mut factory = RecordingFactory::new().with_image_size("switchOff", 80.0, 40.0);
        let mut pass = LayoutPass::new();
        let mut created = Vec::new();
        let visuals = materialize_row(
            &layout,
            &row(RowKind::Bool, "Music"),
            1.5,
            false,
            &mut factory,
            &mut pass,
            &mut created,
        )
        .unwrap();
        pass.resolve_all(&mut factory).unwrap();

        let tile = factory.geometry(visuals.tile).unwrap();
        assert_eq!((tile.y, tile.width, tile.height), (75.0, 400.0, 50.0));

        let label = factory.element(visuals.label).unwrap();
        assert_eq!((label.geometry.x, label.geometry.y), (20.0, 100.0));
        assert_eq!(label.origin, (0.0, 0.5));
        assert_eq!(label.tint, None);

        let toggle = factory.element(visuals.control).unwrap();
        assert_eq!(toggle.image.as_deref(), Some("switchOff"));
        assert_eq!(toggle.geometry.x, 400.0 - 80.0 - EDGE_MARGIN);
        assert_eq!(toggle.geometry.y, 100.0);
    }

    #[test]
    fn link_row_overlay_matches_label() {
        let layout = layout();
        let mut factory = RecordingFactory::new();
        let mut pass = LayoutPass::new();
        let mut created = Vec::new();
        let visuals = materialize_row(
            &layout,
            &row(RowKind::Link, "Credits"),
            3.0,
            false,
            &mut factory,
            &mut pass,
            &mut created,
        )
        .unwrap();
        assert_eq!(created, vec![visuals.tile, visuals.label, visuals.control]);
        pass.resolve_all(&mut factory).unwrap();

        let label = factory.element(visuals.label).unwrap();
        let overlay = factory.element(visuals.control).unwrap();
        assert_eq!(label.tint, Some(layout.link_tint));
        assert_eq!(overlay.kind, ElementKind::Button);
        assert_eq!(overlay.image.as_deref(), Some("transp"));
        assert_eq!(overlay.geometry, label.geometry);
        assert_eq!(overlay.origin, label.origin);
    }
}
