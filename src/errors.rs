error_chain! {
    foreign_links {
        Clap(::clap::Error);
        Io(::std::io::Error);
    }

    errors {
        Config(msg: String) {
            description("invalid configuration")
            display("configuration error: {}", msg)
        }
        Remote(operation: String) {
            description("remote call failed")
            display("failed to {}", operation)
        }
        Cancelled(reason: String) {
            description("cancelled")
            display("stopped waiting for the association: {}", reason)
        }
        UnexpectedStatus(code: String) {
            description("unexpected association status")
            display("unexpected association status: {}", code)
        }
    }
}
