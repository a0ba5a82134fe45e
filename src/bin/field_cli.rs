#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("field_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use field_engine::Engine;
    use field_engine::grid::{Point2, linspace};
    use field_engine::path::PathKind;

    const USAGE: &str = r#"field_cli (field-engine)

USAGE:
  field_cli list
  field_cli analyze <P> <Q> [--name <name>]
  field_cli work <field> [options]
  field_cli sweep <field> [options]

<field> is a 1-based index from `list` or a registered name.

OPTIONS (work):
  --path <kind>      line | parabola | canonical-parabola | family (default: line)
  --from <x,y>       Start point (default: 0,0)
  --to <x,y>         End point (default: 1,1)
  --a <value>        Shape parameter of the family path
  --samples <n>      Number of trapezoid samples (default: 2000)
  --p <expr>         Register an extra field with this P before computing
  --q <expr>         Register an extra field with this Q before computing

OPTIONS (sweep):
  --from <x,y>       Start point (default: 0,0)
  --to <x,y>         End point (default: 1,1)
  --min <a>          Lower end of the shape range
  --max <a>          Upper end of the shape range
  --steps <n>        Number of shape values
  --samples <n>      Number of trapezoid samples (default: 2000)
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        let mut engine = Engine::new();
        match command.as_str() {
            "list" => {
                print_fields(&engine);
                Ok(())
            }
            "analyze" => run_analyze(&mut engine, &mut args),
            "work" => run_work(&mut engine, &mut args),
            "sweep" => run_sweep(&engine, &mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        print!("{USAGE}");
    }

    fn print_fields(engine: &Engine) {
        for (index, record) in engine.registry().iter().enumerate() {
            let marker = if record.is_conservative() { "conservative" } else { "rotational" };
            println!("{:>2}. {} [{marker}]", index + 1, record.name());
        }
    }

    fn run_analyze(engine: &mut Engine, args: &mut Args) -> Result<(), String> {
        let p = args.value("<P>")?;
        let q = args.value("<Q>")?;
        let mut name = String::new();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--name" => name = args.value("--name")?,
                other => return Err(format!("unknown option `{other}` for analyze")),
            }
        }

        let (name, record) = engine
            .register_field(&name, &p, &q)
            .map_err(|err| err.to_string())?;
        let summary = record.summary();
        println!("name:         {name}");
        println!("P:            {}", summary.p);
        println!("Q:            {}", summary.q);
        println!("curl:         {}", summary.curl);
        println!("conservative: {}", summary.conservative);
        match (summary.potential, summary.potential_note) {
            (Some(potential), _) => println!("potential:    {potential}"),
            (None, Some(note)) => println!("potential:    unavailable ({note})"),
            (None, None) => {}
        }
        Ok(())
    }

    fn run_work(engine: &mut Engine, args: &mut Args) -> Result<(), String> {
        let field = args.value("<field>")?;
        let mut kind = PathKind::Line;
        let mut start: Point2 = [0.0, 0.0];
        let mut end: Point2 = [1.0, 1.0];
        let mut shape = None;
        let mut samples = engine.config().integration.samples;
        let mut extra_p = None;
        let mut extra_q = None;

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--path" => {
                    kind = args
                        .value("--path")?
                        .parse()
                        .map_err(|err: field_engine::path::UnknownPathKind| err.to_string())?;
                }
                "--from" => start = parse_point(&args.value("--from")?)?,
                "--to" => end = parse_point(&args.value("--to")?)?,
                "--a" => shape = Some(parse_number(&args.value("--a")?)?),
                "--samples" => samples = parse_count(&args.value("--samples")?)?,
                "--p" => extra_p = Some(args.value("--p")?),
                "--q" => extra_q = Some(args.value("--q")?),
                other => return Err(format!("unknown option `{other}` for work")),
            }
        }

        let name = match (extra_p, extra_q) {
            (Some(p), Some(q)) => {
                let (name, _) = engine
                    .register_field(&field, &p, &q)
                    .map_err(|err| err.to_string())?;
                name
            }
            (None, None) => resolve_field(engine, &field)?,
            _ => return Err("--p and --q must be given together".to_owned()),
        };

        let work = engine
            .compute_work(&name, kind, start, end, shape, samples)
            .map_err(|err| err.to_string())?;
        println!("field:   {name}");
        println!("path:    {kind} {start:?} -> {end:?}");
        println!("samples: {samples}");
        println!("work:    {work:.6}");
        Ok(())
    }

    fn run_sweep(engine: &Engine, args: &mut Args) -> Result<(), String> {
        let field = args.value("<field>")?;
        let settings = engine.config().sweep;
        let mut start: Point2 = [0.0, 0.0];
        let mut end: Point2 = [1.0, 1.0];
        let mut min = settings.min;
        let mut max = settings.max;
        let mut steps = settings.display_steps;
        let mut samples = engine.config().integration.samples;

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--from" => start = parse_point(&args.value("--from")?)?,
                "--to" => end = parse_point(&args.value("--to")?)?,
                "--min" => min = parse_number(&args.value("--min")?)?,
                "--max" => max = parse_number(&args.value("--max")?)?,
                "--steps" => steps = parse_count(&args.value("--steps")?)?,
                "--samples" => samples = parse_count(&args.value("--samples")?)?,
                other => return Err(format!("unknown option `{other}` for sweep")),
            }
        }

        let name = resolve_field(engine, &field)?;
        let values = linspace(min, max, steps);
        let points = engine
            .sweep_family(&name, start, end, &values, samples)
            .map_err(|err| err.to_string())?;
        println!("field: {name}");
        println!("{:>10} {:>14}", "a", "W(a)");
        for point in &points {
            println!("{:>10.4} {:>14.6}", point.a, point.work);
        }
        match field_engine::work::find_minimum(&points) {
            Some(best) => println!("minimum: W({:.4}) = {:.6}", best.a, best.work),
            None => println!("minimum: none"),
        }
        Ok(())
    }

    /// Een 1-gebaseerde index uit `list` of een geregistreerde naam.
    fn resolve_field(engine: &Engine, reference: &str) -> Result<String, String> {
        if let Ok(index) = reference.trim().parse::<usize>() {
            let names = engine.list_fields();
            return index
                .checked_sub(1)
                .and_then(|position| names.get(position))
                .map(|name| (*name).to_owned())
                .ok_or_else(|| format!("no field with index {index} ({} registered)", names.len()));
        }
        engine
            .field(reference)
            .map(|record| record.name().to_owned())
            .map_err(|err| err.to_string())
    }

    fn parse_point(text: &str) -> Result<Point2, String> {
        let mut parts = text.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(x), Some(y), None) => Ok([parse_number(x)?, parse_number(y)?]),
            _ => Err(format!("expected a point as `x,y`, got `{text}`")),
        }
    }

    fn parse_number(text: &str) -> Result<f64, String> {
        text.trim()
            .parse()
            .map_err(|_| format!("invalid number `{text}`"))
    }

    fn parse_count(text: &str) -> Result<usize, String> {
        text.trim()
            .parse()
            .map_err(|_| format!("invalid count `{text}`"))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
