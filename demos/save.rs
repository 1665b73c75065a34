use plotter::{
    Collection, Color, DisplayLines, Function, LineStyle, Plotter, PointType, StackingDirection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut plotter = Plotter::new("Measurements", "time (s)", "value");
    plotter.set_stacking_direction(StackingDirection::Vertical);

    let xs: Vec<f64> = (0..12).map(|i| f64::from(i) * 0.5).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x * 1.3).sin() * 2.0 + 0.1 * x).collect();
    let x_err = vec![0.1; xs.len()];
    let y_err: Vec<f64> = ys.iter().map(|y| 0.15 + 0.05 * y.abs()).collect();
    let samples = Collection::with_errors(&xs, &ys, &x_err, &y_err)?
        .with_name("samples")
        .with_point_type(PointType::Cross);
    plotter.add_collection(samples, 0)?;
    plotter.add_function(
        Function::new(|x| (x * 1.3).sin() * 2.0 + 0.1 * x)
            .with_name("model")
            .with_line_style(LineStyle::Dashed),
        0,
    )?;

    plotter
        .add_sub_plot("Residual window", "x", "")
        .add_collection(
            Collection::from_xy(&[-3.0, -1.0, 0.5, 2.0, 3.0], &[0.2, -0.4, 0.1, 0.3, -0.2])?
                .with_name("residuals")
                .with_color(Color::rgb(40, 40, 40))
                .with_display_lines(DisplayLines::YES),
        )
        .add_function(Function::new(|_| 0.0).with_name("zero"))
        .set_window(-4.0, 1.0, 8.0, 2.0);

    let name = std::env::temp_dir().join("plotter_demo");
    let path = plotter.try_save(&name)?;
    println!("wrote {}", path.display());
    Ok(())
}
