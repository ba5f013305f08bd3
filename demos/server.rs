use cmdtree::{Command, Flag};

fn main() {
    let parser = Command::new("server")
        .about("An example server.")
        .add_flag(
            Flag::new("config", "config.yaml")
                .short('c')
                .help("The config file."),
        )
        .add_flag(Flag::new("port", 8080).short('p').help("The port to listen on."))
        .run(|args| {
            let config = args.value::<String>("config").unwrap();
            let port = args.value::<i32>("port").unwrap();
            println!("Loaded '{config}', ready to serve on port {port}.");
            0
        })
        .add_command(
            Command::new("serve")
                .about("Start serving requests.")
                .add_flag(Flag::new("port", 8080).short('p').help("The port to listen on."))
                .add_flag(Flag::new("verbose", false).short('v').help("Log every request."))
                .run(|args| {
                    let port = args.value::<i32>("port").unwrap();
                    let verbose = args.value::<bool>("verbose").unwrap();
                    println!("Serving on port {port} (verbose: {verbose}).");
                    0
                }),
        )
        .add_command(
            Command::new("version")
                .about("Show the version information.")
                .run(|_| {
                    println!("Version: {}", env!("CARGO_PKG_VERSION"));
                    0
                }),
        )
        .build();

    std::process::exit(parser.parse());
}
