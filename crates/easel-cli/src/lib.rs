//! CLI logic for the Easel demo driver.
//!
//! The CLI builds a grid of composite cards on a [`RecordingEngine`],
//! renders it through a [`View`], replays a simulated drag and wheel
//! gesture and writes an SVG snapshot of the resulting scene.

pub mod config;
pub mod error;

mod args;

pub use args::Args;
pub use error::CliError;

use std::time::Duration;

use log::{debug, info};

use easel::{
    EaselError, View,
    color::Color,
    composite::SubShapeConfig,
    config::AppConfig,
    engine::RecordingEngine,
    export::{Exporter, svg::Svg},
    geometry::{Point, Size},
    identifier::Id,
    interaction::{InteractionEvent, Interactions},
    shape::{Shape, ShapeConfig, ShapeOption, Style},
};

const CARD_WIDTH: f32 = 120.0;
const CARD_HEIGHT: f32 = 70.0;
const CARD_GAP: f32 = 30.0;
const LABEL_PADDING: f32 = 10.0;
const PALETTE: [&str; 4] = ["#4e79a7", "#f28e2b", "#59a14f", "#e15759"];
const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 1000;

/// Run the Easel CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - Invalid arguments
/// - Configuration loading errors
/// - Engine or shape errors while rendering
/// - Export errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        rows = args.rows,
        columns = args.columns,
        output_path = args.output;
        "Running demo"
    );
    if args.width <= 0.0 || args.height <= 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "container must have a positive size, got {}x{}",
            args.width, args.height
        )));
    }

    let app_config = config::load_config(args.config.as_ref())?;
    let background = app_config
        .view()
        .background_color()
        .map_err(config::ConfigError::Validation)?;

    let engine = RecordingEngine::new(Size::new(args.width, args.height));
    let mut view = View::new(engine, &app_config)?;
    for row in 0..args.rows {
        for column in 0..args.columns {
            view.add_shape("cards", card(row, column)?);
        }
    }
    view.render_shapes()?;
    settle(&mut view);

    replay_input(args, &app_config, &mut view);

    let svg = Svg::new(&args.output).with_background(background);
    svg.export_scene(view.engine()).map_err(EaselError::from)?;

    info!(output_file = args.output; "SVG snapshot exported successfully");
    Ok(())
}

/// Fill and stroke of the card at `(row, column)`.
fn card_style(row: usize, column: usize) -> Style {
    let mut style = Style::new().with_line_width(2.0);
    if let Ok(fill) = Color::new(PALETTE[(row + column) % PALETTE.len()]) {
        style = style.with_fill(fill.with_alpha(0.8));
    }
    if let Ok(stroke) = Color::new("#333333") {
        style = style.with_stroke(stroke);
    }
    style
}

/// Builds one card: a body rectangle with a text label.
fn card(row: usize, column: usize) -> Result<Shape, EaselError> {
    let mut card = Shape::from_type(Id::new(&format!("card-{row}-{column}")), "composite")?;
    card.set_position(Point::new(
        column as f32 * (CARD_WIDTH + CARD_GAP),
        row as f32 * (CARD_HEIGHT + CARD_GAP),
    ));
    card.apply_config(ShapeConfig::option(
        ShapeOption::new().with_size(Size::new(CARD_WIDTH, CARD_HEIGHT)),
    ));
    card.apply_config(ShapeConfig::style(card_style(row, column)));

    let label = format!("{row}:{column}");
    if let Some(composite) = card.composite_mut() {
        composite.add_sub_shape([
            (
                "body",
                SubShapeConfig::new("rect").with_draw(|parent: &Shape, body: &mut Shape| {
                    body.set_size(parent.size());
                    body.set_position(parent.position());
                }),
            ),
            (
                "label",
                SubShapeConfig::new("text")
                    .with_init(move |_, _| {
                        ShapeConfig::option(
                            ShapeOption::new()
                                .with_content(label.clone())
                                .with_z_index(1),
                        )
                    })
                    .with_draw(|parent: &Shape, text: &mut Shape| {
                        text.set_position(
                            parent
                                .position()
                                .add_point(Point::new(LABEL_PADDING, LABEL_PADDING)),
                        );
                    }),
            ),
        ])?;
    }
    Ok(card)
}

/// Replays the simulated drag and wheel input, letting every animation
/// land before the next gesture.
fn replay_input(args: &Args, app_config: &AppConfig, view: &mut View<RecordingEngine>) {
    let mut interactions = Interactions::from_config(app_config.interaction());
    interactions.on_interaction(|event| debug!(event:? = event; "Interaction responded"));

    if let Some([dx, dy]) = args.drag.as_deref() {
        let start = Point::new(args.width / 2.0, args.height / 2.0);
        let end = start.add_point(Point::new(*dx, *dy));
        interactions.dispatch(InteractionEvent::PointerDown(start), view);
        interactions.dispatch(InteractionEvent::PointerMove(end), view);
        interactions.dispatch(InteractionEvent::PointerUp, view);
        settle(view);
    }

    let delta = if args.zoom < 0 { -1.0 } else { 1.0 };
    for _ in 0..args.zoom.unsigned_abs() {
        interactions.dispatch(InteractionEvent::Wheel { delta }, view);
        settle(view);
    }
}

/// Advances the engine clock frame by frame until every animated pass
/// has finished.
fn settle(view: &mut View<RecordingEngine>) {
    let mut frames = 0;
    view.tick();
    while !view.is_settled() && frames < MAX_FRAMES {
        view.engine_mut().advance(FRAME);
        view.tick();
        frames += 1;
    }
    if !view.is_settled() {
        view.engine_mut().complete_animations();
        view.tick();
    }
    debug!(frames = frames; "View settled");
}
