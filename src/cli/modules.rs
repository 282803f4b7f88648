use std::path::{Path, PathBuf};

use crate::archive::{merge_archives, MergeOptions};
use crate::compile::{compile_to_exit_code, FallbackNamer, JavaCompiler, SystemJavac};
use crate::error::log_error;

use super::dispatch::Module;

/// Flag accepted by `merge-jar-files` anywhere after the module name.
pub const DROP_MANIFEST: &str = "--drop-manifest";

/// `merge-jar-files <target> <source-1> <source-2> [...]`
#[derive(Debug, Default)]
pub struct MergeJarFiles;

impl MergeJarFiles {
    /// Splits `args` into the positional paths and the merge options.
    fn parse(args: &[String]) -> (Vec<PathBuf>, MergeOptions) {
        let mut options = MergeOptions::default();
        let mut paths = Vec::with_capacity(args.len());
        for arg in args {
            if arg == DROP_MANIFEST {
                options.drop_manifest = true;
            } else {
                paths.push(PathBuf::from(arg));
            }
        }
        (paths, options)
    }
}

impl Module for MergeJarFiles {
    fn name(&self) -> &'static str {
        "merge-jar-files"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["merge"]
    }

    fn usage(&self) -> &'static str {
        "merges several JAR files, copying every entry in order.\n            \
         The arguments are: <target-jar-name> <source-jar-name-1> <source-jar-name-2> \
         [...] [--drop-manifest]"
    }

    fn check_args(&self, args: &[String]) -> bool {
        let positional = args.iter().filter(|a| a.as_str() != DROP_MANIFEST).count();
        positional >= 3
    }

    fn run(&mut self, args: &[String]) -> i32 {
        let (paths, options) = Self::parse(args);
        let Some((output, inputs)) = paths.split_first() else {
            return 1;
        };
        match merge_archives(output, inputs, &options) {
            Ok(_) => 0,
            Err(e) => {
                log_error("merging JAR files failed", &e);
                1
            }
        }
    }
}

/// `compile-java-files <temp-dir> <output-jar> <source-files...>`
///
/// The fallback namer lives as long as the module, so chained compile
/// invocations in one process keep drawing from the same sequence.
pub struct CompileJavaFiles {
    compiler: Box<dyn JavaCompiler>,
    namer: FallbackNamer,
}

impl CompileJavaFiles {
    pub fn new(compiler: Box<dyn JavaCompiler>) -> Self {
        Self {
            compiler,
            namer: FallbackNamer::seeded(),
        }
    }

    pub fn with_javac(program: PathBuf) -> Self {
        Self::new(Box::new(SystemJavac::new(program)))
    }
}

impl Module for CompileJavaFiles {
    fn name(&self) -> &'static str {
        "compile-java-files"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["compile"]
    }

    fn usage(&self) -> &'static str {
        "compiles Java source files given. Arguments:\n            \
         <temporary directory> <resulting jar file> <source files>"
    }

    fn check_args(&self, args: &[String]) -> bool {
        args.len() >= 3
    }

    fn run(&mut self, args: &[String]) -> i32 {
        let [scratch, output, sources @ ..] = args else {
            return 1;
        };
        let sources: Vec<PathBuf> = sources.iter().map(PathBuf::from).collect();
        compile_to_exit_code(
            Path::new(scratch),
            Path::new(output),
            &sources,
            &*self.compiler,
            &mut self.namer,
        )
    }
}
