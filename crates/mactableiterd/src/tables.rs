//! Option and status key constants for mactableiterd

/// Option carrying the name to greet
pub const OPTION_NAME: &str = "name";

/// Option requesting a MAC table enumeration
pub const OPTION_MAC: &str = "mac";

/// Option requesting the example bindings
pub const OPTION_SET: &str = "set";

/// Option requesting removal of every MAC entry
pub const OPTION_CLEAR: &str = "clear";

/// Status key names
pub mod status_keys {
    /// Greeting shown to the operator
    pub const GREETING: &str = "greeting";

    /// Summary of the last example install
    pub const MAC_SET: &str = "mac_set";

    /// Summary of the last table clear
    pub const MAC_CLEAR: &str = "mac_clear";
}

/// Greeting values
pub mod greetings {
    /// Published when no name is configured
    pub const PROMPT: &str = "Welcome! What is your name?";

    /// Published when the name option is removed
    pub const GOODBYE: &str = "Goodbye!";

    /// Published when the agent is disabled
    pub const ADIOS: &str = "Adios!";

    /// Personalized greeting
    pub fn hello(name: &str) -> String {
        format!("Hello {}!", name)
    }
}

/// Example bindings installed by the `set` option: (vlan, address, interface)
///
/// The first key is written twice; the second write leaves it unchanged.
pub const EXAMPLE_BINDINGS: [(u16, &str, &str); 3] = [
    (1, "0000.1111.2222", "Ethernet1"),
    (1, "0000.1111.2221", "Ethernet1"),
    (1, "0000.1111.2222", "Ethernet1"),
];
