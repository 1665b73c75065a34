use plotter::{Collection, DisplayLines, PlotError, Plotter, PointType};

fn main() -> Result<(), PlotError> {
    env_logger::init();

    let square = Collection::new((0..=4).map(|i| {
        let x = f64::from(i);
        (x, x * x)
    }))
    .with_name("x^2")
    .with_display_lines(DisplayLines::YES)
    .with_point_type(PointType::Circle);

    let mut plotter = Plotter::new("Square", "x", "y");
    plotter.add_collection(square, 0)?;

    if !plotter.plot() {
        std::process::exit(1);
    }
    Ok(())
}
