use std::{env::args_os, process::exit};

use resdir::{
    cmd_pipeline::{build_pipeline, parser::OutputFormat, PipelineValues},
    logging::init_logging,
};
use serde::Serialize;
use serde_json::{to_string, to_string_pretty};

fn print_json<T: Serialize>(value: &T, output_format: &OutputFormat) {
    let printed = match output_format {
        OutputFormat::Concise => to_string(value),
        OutputFormat::Pretty => to_string_pretty(value),
    };
    match printed {
        Ok(s) => println!("{}", s),
        Err(err) => eprintln!("Unable to serialize result: {}", err),
    }
}

/// Usage: `directory-tool 'select AI | hover-enter 15 | show'`.  Passing the
/// pipeline as separate words works too, as long as the `|`s get through the
/// shell.
#[tokio::main]
async fn main() {
    init_logging();

    let os_args: Vec<String> = args_os()
        .map(|os| os.into_string().unwrap_or_default())
        .collect();
    let bin_name = os_args
        .first()
        .map(String::as_str)
        .unwrap_or("directory-tool");
    let arg_str = match &os_args[1.min(os_args.len())..] {
        [single] => single.clone(),
        rest => shell_words::join(rest),
    };

    let (pipeline, output_format) = match build_pipeline(bin_name, &arg_str) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("You did not specify a good pipeline!\n{}", err);
            exit(2);
        }
    };

    let result = match pipeline.run(false).await {
        Ok(result) => result,
        Err(err) => {
            println!("Pipeline Error!");
            println!("{}", err);
            exit(1);
        }
    };

    match result {
        PipelineValues::Void => {
            println!("Void result.");
        }
        PipelineValues::TextFile(tf) => {
            println!("{}", tf.contents);
        }
        PipelineValues::Interaction(summary) => print_json(&summary, &output_format),
        PipelineValues::Activation(activation) => print_json(&activation, &output_format),
        PipelineValues::CategoryList(cl) => print_json(&cl.categories, &output_format),
        PipelineValues::View(snapshot) => print_json(&snapshot, &output_format),
    }
}
