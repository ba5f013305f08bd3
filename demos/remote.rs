use cmdtree::{Command, Flag};
use std::cell::RefCell;

fn main() {
    let remotes: RefCell<Vec<(String, String)>> = RefCell::new(vec![(
        "origin".to_string(),
        "https://example.com/origin".to_string(),
    )]);

    let parser = Command::new("tool")
        .about("Manage a list of remotes.")
        .add_command(
            Command::new("remote")
                .about("Manage remotes.")
                .description("Remotes are named references to other servers.  Without a sub-command, lists them.")
                .add_flag(Flag::new("verbose", false).short('v').help("Show the remote urls."))
                .run(|args| {
                    let verbose = args.value::<bool>("verbose").unwrap();

                    for (name, url) in remotes.borrow().iter() {
                        if verbose {
                            println!("{name}\t{url}");
                        } else {
                            println!("{name}");
                        }
                    }

                    0
                })
                .add_command(
                    Command::new("add")
                        .about("Add a remote.")
                        .add_flag(Flag::new("name", "").short('n').help("The name of the remote."))
                        .add_flag(Flag::new("url", "").short('u').help("The url of the remote."))
                        .run(|args| {
                            let name = args.value::<String>("name").unwrap();
                            let url = args.value::<String>("url").unwrap();

                            if name.is_empty() || url.is_empty() {
                                eprintln!("Both --name and --url are required.");
                                return 1;
                            }

                            println!("Added '{name}' -> {url}.");
                            remotes.borrow_mut().push((name, url));
                            0
                        }),
                )
                .add_command(
                    Command::new("remove")
                        .about("Remove a remote.")
                        .add_flag(Flag::new("name", "").short('n').help("The name of the remote."))
                        .run(|args| {
                            let name = args.value::<String>("name").unwrap();
                            let before = remotes.borrow().len();
                            remotes.borrow_mut().retain(|(n, _)| n != &name);

                            if remotes.borrow().len() == before {
                                eprintln!("No such remote '{name}'.");
                                1
                            } else {
                                println!("Removed '{name}'.");
                                0
                            }
                        }),
                ),
        )
        .build();

    std::process::exit(parser.parse());
}
