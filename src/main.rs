use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use facegate::{logging, Config, FaceError, FaceTech, ImageFile, SubjectId};

#[derive(Debug, PartialEq)]
enum Command {
    Detect { image: PathBuf },
    DetectBase64 { input: String },
    CreateCollection { collection_id: Option<String> },
    Enroll { subject: String },
    AddFace { subject: String, image: PathBuf, associate: bool },
    Disenroll { subject: String },
    RemoveFace { face_id: String },
    RemoveFaceFromUser { subject: String, face_id: String },
    RemoveAllFaces { subject: String },
    ListUsers,
    ListFaces { subject: Option<String> },
    Verify { subject: String, image: PathBuf },
    Identify { image: PathBuf },
    Compare { source: PathBuf, target: PathBuf },
    LivenessSession,
    LivenessResult { session_id: String },
}

struct Args {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut rest = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("facegate {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    match parse_command(&rest) {
        Ok(command) => Args {
            config_path,
            command,
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    }
}

fn parse_command(args: &[String]) -> Result<Command> {
    let (name, rest) = args.split_first().ok_or_else(|| anyhow!("missing command"))?;
    let mut positional: Vec<&str> = Vec::new();
    let mut associate = true;

    for arg in rest {
        match arg.as_str() {
            "--no-associate" if name == "add-face" => associate = false,
            flag if flag.starts_with("--") => bail!("unknown option {} for {}", flag, name),
            value => positional.push(value),
        }
    }

    let arity = |n: usize| -> Result<()> {
        if positional.len() != n {
            bail!("{} takes {} argument(s), got {}", name, n, positional.len());
        }
        Ok(())
    };

    let command = match name.as_str() {
        "detect" => {
            arity(1)?;
            Command::Detect {
                image: PathBuf::from(positional[0]),
            }
        }
        "detect-base64" => {
            arity(1)?;
            Command::DetectBase64 {
                input: positional[0].to_string(),
            }
        }
        "create-collection" => {
            if positional.len() > 1 {
                bail!("create-collection takes at most 1 argument");
            }
            Command::CreateCollection {
                collection_id: positional.first().map(|s| s.to_string()),
            }
        }
        "enroll" => {
            arity(1)?;
            Command::Enroll {
                subject: positional[0].to_string(),
            }
        }
        "add-face" => {
            arity(2)?;
            Command::AddFace {
                subject: positional[0].to_string(),
                image: PathBuf::from(positional[1]),
                associate,
            }
        }
        "disenroll" => {
            arity(1)?;
            Command::Disenroll {
                subject: positional[0].to_string(),
            }
        }
        "remove-face" => {
            arity(1)?;
            Command::RemoveFace {
                face_id: positional[0].to_string(),
            }
        }
        "remove-face-from-user" => {
            arity(2)?;
            Command::RemoveFaceFromUser {
                subject: positional[0].to_string(),
                face_id: positional[1].to_string(),
            }
        }
        "remove-all-faces" => {
            arity(1)?;
            Command::RemoveAllFaces {
                subject: positional[0].to_string(),
            }
        }
        "list-users" => {
            arity(0)?;
            Command::ListUsers
        }
        "list-faces" => {
            if positional.len() > 1 {
                bail!("list-faces takes at most 1 argument");
            }
            Command::ListFaces {
                subject: positional.first().map(|s| s.to_string()),
            }
        }
        "verify" => {
            arity(2)?;
            Command::Verify {
                subject: positional[0].to_string(),
                image: PathBuf::from(positional[1]),
            }
        }
        "identify" => {
            arity(1)?;
            Command::Identify {
                image: PathBuf::from(positional[0]),
            }
        }
        "compare" => {
            arity(2)?;
            Command::Compare {
                source: PathBuf::from(positional[0]),
                target: PathBuf::from(positional[1]),
            }
        }
        "liveness-session" => {
            arity(0)?;
            Command::LivenessSession
        }
        "liveness-result" => {
            arity(1)?;
            Command::LivenessResult {
                session_id: positional[0].to_string(),
            }
        }
        other => bail!("unknown command {}", other),
    };

    Ok(command)
}

fn print_help() {
    println!(
        r#"facegate - face detection, recognition and verification with Amazon Rekognition

USAGE:
    facegate [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    detect IMAGE                        Detect a face in an image
    detect-base64 FILE|-                Detect a face in base64 text (file or stdin)
    create-collection [ID]              Create the face collection
    enroll SUBJECT                      Create a user for SUBJECT
    add-face SUBJECT IMAGE [--no-associate]
                                        Index a face and associate it with SUBJECT
    disenroll SUBJECT                   Delete the user for SUBJECT
    remove-face FACE_ID                 Delete a face from the collection
    remove-face-from-user SUBJECT FACE_ID
                                        Detach a face from SUBJECT
    remove-all-faces SUBJECT            Delete every face of SUBJECT
    list-users                          List users in the collection
    list-faces [SUBJECT]                List faces, optionally of one SUBJECT
    verify SUBJECT IMAGE                Check that IMAGE shows SUBJECT
    identify IMAGE                      Find the user shown in IMAGE
    compare SOURCE TARGET               Compare the faces of two images
    liveness-session                    Start a face liveness session
    liveness-result SESSION_ID          Check a liveness session result

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    FACEGATE_CONFIG     Path to config file (overrides default location)
    FACEGATE_LOG        Log level (trace, debug, info, warn, error)
    AWS_REGION, AWS_PROFILE, AWS_ACCESS_KEY_ID, ...
                        Standard AWS SDK settings; shared profiles, SSO and
                        instance roles are also picked up

Config file location: $XDG_CONFIG_HOME/facegate/config.toml

EXIT STATUS:
    0 success, 2 face rejected (no face, no match, not enrolled, ...), 1 other errors"#
    );
}

fn main() -> ExitCode {
    let args = parse_args();

    // Logs go to journald or a file so stdout stays machine-readable
    let _ = logging::init(Some(Config::config_dir().join("logs")));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<FaceError>() {
                Some(face_error) if face_error.is_rejection() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let tech = FaceTech::from_config(&config)?;
    let output = execute(&tech, &config, args.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn execute(tech: &FaceTech, config: &Config, command: Command) -> Result<Value> {
    let recognition = tech.recognition();

    match command {
        Command::Detect { image } => json(tech.detection().detect_file_image(&open(image)?)?),
        Command::DetectBase64 { input } => {
            let data = read_text(&input)?;
            json(tech.detection().detect_base64_image(&data)?)
        }
        Command::CreateCollection { collection_id } => {
            let collection_id =
                collection_id.unwrap_or_else(|| config.recognition.aws_collection_id.clone());
            json(recognition.create_collection(&collection_id)?)
        }
        Command::Enroll { subject } => {
            json(recognition.enroll_subject(&SubjectId::new(subject))?)
        }
        Command::AddFace {
            subject,
            image,
            associate,
        } => json(recognition.add_face_image(&SubjectId::new(subject), &open(image)?, associate)?),
        Command::Disenroll { subject } => {
            json(recognition.disenroll_subject(&SubjectId::new(subject))?)
        }
        Command::RemoveFace { face_id } => json(recognition.remove_face_image(&face_id)?),
        Command::RemoveFaceFromUser { subject, face_id } => {
            json(recognition.remove_face_from_user(&subject, &face_id)?)
        }
        Command::RemoveAllFaces { subject } => {
            json(recognition.remove_all_face_images(&SubjectId::new(subject))?)
        }
        Command::ListUsers => json(recognition.list_users()?),
        Command::ListFaces { subject } => {
            let subject = subject.map(SubjectId::new);
            json(recognition.list_faces(subject.as_ref().map(|s| s as &dyn facegate::Subject))?)
        }
        Command::Verify { subject, image } => json(
            recognition.verify_face_image_against_a_subject(&SubjectId::new(subject), &open(image)?)?,
        ),
        Command::Identify { image } => {
            let user_id = recognition.find_user_using_image(&open(image)?)?;
            Ok(serde_json::json!({ "user_id": user_id }))
        }
        Command::Compare { source, target } => json(
            tech.verification()
                .compare_two_face_images(&open(source)?, &open(target)?)?,
        ),
        Command::LivenessSession => {
            let session_id = recognition.create_liveness_session()?;
            Ok(serde_json::json!({ "session_id": session_id }))
        }
        Command::LivenessResult { session_id } => {
            json(recognition.check_liveness_session_result(&session_id)?)
        }
    }
}

fn open(path: PathBuf) -> Result<ImageFile> {
    Ok(ImageFile::open(&path)?)
}

/// Read base64 text from a file, or from stdin for `-`.
fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        let mut data = String::new();
        std::io::stdin()
            .read_to_string(&mut data)
            .context("Failed to read base64 image from stdin")?;
        Ok(data)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
