use super::{CommandTemplate, LanguageProfile, ARTIFACT, DIR, SOURCE};

const fn interpreted(
    id: &'static str,
    name: &'static str,
    version: &'static str,
    extension: &'static str,
    run: CommandTemplate,
) -> LanguageProfile {
    LanguageProfile {
        id,
        name,
        version,
        extension,
        source_stem: "main",
        artifact: None,
        compile: None,
        run,
    }
}

const INTERPRETER_ARGS: &[&str] = &[SOURCE];

const fn interpreter(program: &'static str) -> CommandTemplate {
    CommandTemplate::new(program, INTERPRETER_ARGS)
}

/// Every supported language. Adding a language means adding a row here.
pub static PROFILES: [LanguageProfile; 17] = [
    interpreted("python", "Python", "3.x", ".py", interpreter("python3")),
    interpreted("javascript", "JavaScript", "Node.js", ".js", interpreter("node")),
    interpreted("typescript", "TypeScript", "ts-node", ".ts", interpreter("ts-node")),
    LanguageProfile {
        id: "java",
        name: "Java",
        version: "JDK 11+",
        extension: ".java",
        // javac requires the public class and its file to share a name
        source_stem: "Main",
        artifact: None,
        compile: Some(CommandTemplate::new("javac", &[SOURCE])),
        run: CommandTemplate::new("java", &["-cp", DIR, "Main"]),
    },
    LanguageProfile {
        id: "cpp",
        name: "C++",
        version: "C++17",
        extension: ".cpp",
        source_stem: "main",
        artifact: Some("main"),
        compile: Some(CommandTemplate::new("g++", &[SOURCE, "-o", ARTIFACT])),
        run: CommandTemplate::new(ARTIFACT, &[]),
    },
    LanguageProfile {
        id: "c",
        name: "C",
        version: "C11",
        extension: ".c",
        source_stem: "main",
        artifact: Some("main"),
        compile: Some(CommandTemplate::new("gcc", &[SOURCE, "-o", ARTIFACT])),
        run: CommandTemplate::new(ARTIFACT, &[]),
    },
    interpreted(
        "go",
        "Go",
        "1.18+",
        ".go",
        CommandTemplate::new("go", &["run", SOURCE]),
    ),
    LanguageProfile {
        id: "rust",
        name: "Rust",
        version: "Latest",
        extension: ".rs",
        source_stem: "main",
        artifact: Some("main"),
        compile: Some(CommandTemplate::new("rustc", &[SOURCE, "-o", ARTIFACT])),
        run: CommandTemplate::new(ARTIFACT, &[]),
    },
    interpreted("ruby", "Ruby", "2.7+", ".rb", interpreter("ruby")),
    interpreted("php", "PHP", "7.4+", ".php", interpreter("php")),
    interpreted("swift", "Swift", "5.x", ".swift", interpreter("swift")),
    LanguageProfile {
        id: "kotlin",
        name: "Kotlin",
        version: "1.5+",
        extension: ".kt",
        source_stem: "main",
        artifact: Some("main.jar"),
        compile: Some(CommandTemplate::new(
            "kotlinc",
            &[SOURCE, "-include-runtime", "-d", ARTIFACT],
        )),
        run: CommandTemplate::new("kotlin", &[ARTIFACT]),
    },
    interpreted("r", "R", "4.x", ".r", interpreter("Rscript")),
    interpreted("perl", "Perl", "5.x", ".pl", interpreter("perl")),
    interpreted("bash", "Bash", "4.x+", ".sh", interpreter("bash")),
    LanguageProfile {
        id: "csharp",
        name: "C#",
        version: ".NET 5+",
        extension: ".cs",
        source_stem: "main",
        artifact: Some("main.exe"),
        compile: Some(CommandTemplate::new(
            "csc",
            &["/out:{artifact}", SOURCE, "/nologo"],
        )),
        run: CommandTemplate::new(ARTIFACT, &[]),
    },
    LanguageProfile {
        id: "scala",
        name: "Scala",
        version: "2.13+",
        extension: ".scala",
        source_stem: "Main",
        artifact: None,
        compile: Some(CommandTemplate::new("scalac", &[SOURCE])),
        run: CommandTemplate::new("scala", &["-cp", DIR, "Main"]),
    },
];
