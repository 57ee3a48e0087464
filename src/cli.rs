use clap::{arg, crate_version, ArgAction, Command, ValueHint};

pub fn build_cli() -> Command {
    let long_help = "a2recover reads 5.25 inch DOS 3.3 disks through a microcontroller
disk controller attached over a serial link.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
check the board:       `a2recover test -p /dev/ttyUSB0`
look at a disk:        `a2recover scan -p /dev/ttyUSB0`
show the catalog:      `a2recover dir -p /dev/ttyUSB0`
recover a disk:        `a2recover capture -p /dev/ttyUSB0 -o mydisk`
keep the raw capture:  `a2recover raw -p /dev/ttyUSB0 -o mydisk`
decode it later:       `a2recover decode -f mydisk`
catalog every image:   `a2recover catalog -o report`";

    let port_arg = arg!(-p --port <DEVICE> "serial device connected to the controller board")
        .value_hint(ValueHint::FilePath)
        .required(true);
    let dir_arg = arg!(-d --dir <PATH> "working directory holding the disk image files")
        .value_hint(ValueHint::DirPath)
        .required(false)
        .default_value("disks");

    let mut main_cmd = Command::new("a2recover")
        .about("Recovers DOS 3.3 disks through a microcontroller disk controller.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("test")
            .arg(port_arg.clone())
            .about("run the controller self test over the serial link"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("scan")
            .arg(port_arg.clone())
            .about("quick scan of tracks 0-4 and 17 to judge the disk"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("dir")
            .arg(port_arg.clone())
            .visible_alias("ls")
            .about("read the VTOC from the drive and show the catalog"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("capture")
            .arg(port_arg.clone())
            .arg(dir_arg.clone())
            .arg(
                arg!(-o --output <NAME> "base name for the image, .bin and .txt are appended")
                    .required(true),
            )
            .arg(
                arg!(-r --retries <COUNT> "motor repositioning cycles allowed per track")
                    .value_parser(clap::value_parser!(usize))
                    .required(false)
                    .default_value("3"),
            )
            .about("capture a disk in DOS 3.3 format (.bin)"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("raw")
            .arg(port_arg.clone())
            .arg(dir_arg.clone())
            .arg(
                arg!(-o --output <NAME> "base name for the image, .raw is appended")
                    .required(true),
            )
            .about("capture a disk in raw format (.raw)"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("decode")
            .arg(dir_arg.clone())
            .arg(
                arg!(-f --file <NAME> "base name of the raw image, .raw is appended")
                    .required(true),
            )
            .about("decode a .raw capture into a .bin image and show the catalog"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("catalog")
            .arg(dir_arg.clone())
            .arg(
                arg!(-o --output <NAME> "base name for the reports, .info endings are appended")
                    .required(false)
                    .default_value("catalog"),
            )
            .arg(arg!(--json "print the catalogs as JSON instead of writing reports").action(ArgAction::SetTrue))
            .about("catalog every .bin image in the working directory"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                arg!(-s --shell <SHELL> "shell to generate completions for")
                    .value_parser(["bash", "elv", "fish", "ps1", "zsh"])
                    .required(true),
            )
            .about("generate shell completions to stdout"),
    );
    return main_cmd;
}
