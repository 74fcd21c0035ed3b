//! Static option table. One row per logical option name.

use super::{OptionDescriptor, OptionKind, ValueDomain};

/// HTTP methods the external tool documents; anything else only triggers an advisory.
pub const HTTP_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "CONNECT", "TRACE",
];

/// Authentication schemes accepted by `--auth-type`.
pub const AUTH_TYPES: &[&str] = &["Basic", "Digest", "NTLM", "PKI", "Bearer"];

/// Proxy types accepted by `--tor-type`.
pub const TOR_TYPES: &[&str] = &["HTTP", "SOCKS4", "SOCKS5"];

/// Output formats accepted by `--dump-format`.
pub const DUMP_FORMATS: &[&str] = &["CSV", "HTML", "SQLITE"];

/// Registry value types accepted by `--reg-type`.
pub const REG_TYPES: &[&str] = &[
    "REG_NONE",
    "REG_SZ",
    "REG_EXPAND_SZ",
    "REG_BINARY",
    "REG_DWORD",
    "REG_DWORD_BIG_ENDIAN",
    "REG_LINK",
    "REG_MULTI_SZ",
    "REG_RESOURCE_LIST",
];

/// Legal `--technique` letters in canonical emission order.
pub const TECHNIQUE_LETTERS: &str = "BEUSTQ";

use OptionKind::{Boolean, Bookkeeping, TechniqueBit, Valued};
use ValueDomain::{
    Choice, Decimal, ExistingDirectory, ExistingFile, Free, Integer, TechniqueLetters, Url,
};

/// Generates the closed `OptionName` enumeration together with the descriptor
/// table. Rows must stay in the same order as the variants so that
/// `OptionName as usize` indexes the table directly.
macro_rules! option_registry {
    ($( $variant:ident => $key:literal, $flag:literal, $kind:expr, $domain:expr; )*) => {
        /// Every logical option the front-end can set.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OptionName {
            $(
                #[doc = concat!("`", $key, "` (`", $flag, "`)")]
                $variant,
            )*
        }

        impl OptionName {
            /// All option names in table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];
        }

        /// Descriptor rows, indexed by `OptionName as usize`.
        pub(super) static DESCRIPTORS: &[OptionDescriptor] = &[
            $(
                OptionDescriptor {
                    name: OptionName::$variant,
                    key: $key,
                    flag: $flag,
                    kind: $kind,
                    domain: $domain,
                },
            )*
        ];
    };
}

option_registry! {
    // Target
    Url => "url", "-u", Valued, Url;
    Direct => "direct", "-d", Valued, Free;
    LogFile => "log_file", "-l", Valued, ExistingFile;
    BulkFile => "bulk_file", "-m", Valued, ExistingFile;
    RequestFile => "request_file", "-r", Valued, ExistingFile;
    GoogleDork => "google_dork", "-g", Valued, Free;
    ConfigFile => "config_file", "-c", Valued, ExistingFile;

    // Request
    Method => "method", "--method", Valued, Choice { values: HTTP_METHODS, strict: false };
    Data => "data", "--data", Valued, Free;
    ParamDel => "param_del", "--param-del", Valued, Free;
    Cookie => "cookie", "--cookie", Valued, Free;
    LoadCookies => "load_cookies", "--load-cookies", Valued, ExistingFile;
    LiveCookies => "live_cookies", "--live-cookies", Valued, ExistingFile;
    RandomAgent => "random_agent", "--random-agent", Boolean, Free;
    UserAgent => "user_agent", "--user-agent", Valued, Free;
    Mobile => "mobile", "--mobile", Boolean, Free;
    Host => "host", "--host", Valued, Free;
    Referer => "referer", "--referer", Valued, Free;
    Headers => "headers", "--headers", Valued, Free;
    AuthType => "auth_type", "--auth-type", Valued, Choice { values: AUTH_TYPES, strict: true };
    AuthCred => "auth_cred", "--auth-cred", Valued, Free;
    AuthFile => "auth_file", "--auth-file", Valued, ExistingFile;
    Proxy => "proxy", "--proxy", Valued, Free;
    ProxyCred => "proxy_cred", "--proxy-cred", Valued, Free;
    ProxyFile => "proxy_file", "--proxy-file", Valued, ExistingFile;
    ProxyFreq => "proxy_freq", "--proxy-freq", Valued, Integer { min: 1, max: Some(1000) };
    Tor => "tor", "--tor", Boolean, Free;
    TorPort => "tor_port", "--tor-port", Valued, Integer { min: 1, max: Some(65535) };
    TorType => "tor_type", "--tor-type", Valued, Choice { values: TOR_TYPES, strict: true };
    CheckTor => "check_tor", "--check-tor", Boolean, Free;
    Delay => "delay", "--delay", Valued, Decimal { min: 0.0, max: Some(3600.0) };
    Timeout => "timeout", "--timeout", Valued, Decimal { min: 1.0, max: Some(3600.0) };
    Retries => "retries", "--retries", Valued, Integer { min: 0, max: Some(50) };
    SafeUrl => "safe_url", "--safe-url", Valued, Free;
    SafeFreq => "safe_freq", "--safe-freq", Valued, Integer { min: 1, max: Some(1000) };
    CsrfToken => "csrf_token", "--csrf-token", Valued, Free;
    CsrfUrl => "csrf_url", "--csrf-url", Valued, Free;
    CsrfRetries => "csrf_retries", "--csrf-retries", Valued, Integer { min: 0, max: Some(10) };
    ForceSsl => "force_ssl", "--force-ssl", Boolean, Free;
    Hpp => "hpp", "--hpp", Boolean, Free;
    Chunked => "chunked", "--chunked", Boolean, Free;

    // Optimization
    Optimize => "optimize", "-o", Boolean, Free;
    KeepAlive => "keep_alive", "--keep-alive", Boolean, Free;
    NullConnection => "null_connection", "--null-connection", Boolean, Free;
    Threads => "threads", "--threads", Valued, Integer { min: 1, max: Some(10) };

    // Injection
    TestableParameter => "testable_parameter", "-p", Valued, Free;
    Skip => "skip", "--skip", Valued, Free;
    SkipStatic => "skip_static", "--skip-static", Boolean, Free;
    Dbms => "dbms", "--dbms", Valued, Free;
    DbmsCred => "dbms_cred", "--dbms-cred", Valued, Free;
    Os => "os", "--os", Valued, Free;
    InvalidBignum => "invalid_bignum", "--invalid-bignum", Boolean, Free;
    InvalidLogical => "invalid_logical", "--invalid-logical", Boolean, Free;
    InvalidString => "invalid_string", "--invalid-string", Boolean, Free;
    NoCast => "no_cast", "--no-cast", Boolean, Free;
    NoEscape => "no_escape", "--no-escape", Boolean, Free;
    Prefix => "prefix", "--prefix", Valued, Free;
    Suffix => "suffix", "--suffix", Valued, Free;
    Tamper => "tamper", "--tamper", Valued, Free;

    // Detection
    Level => "level", "--level", Valued, Integer { min: 1, max: Some(5) };
    Risk => "risk", "--risk", Valued, Integer { min: 1, max: Some(3) };
    String => "string", "--string", Valued, Free;
    NotString => "not_string", "--not-string", Valued, Free;
    Regexp => "regexp", "--regexp", Valued, Free;
    Code => "code", "--code", Valued, Free;
    TextOnly => "text_only", "--text-only", Boolean, Free;
    Titles => "titles", "--titles", Boolean, Free;
    Smart => "smart", "--smart", Boolean, Free;

    // Techniques
    Technique => "technique", "--technique", Valued, TechniqueLetters;
    BooleanBlind => "boolean_blind", "--technique", TechniqueBit('B'), Free;
    ErrorBased => "error_based", "--technique", TechniqueBit('E'), Free;
    UnionBased => "union_based", "--technique", TechniqueBit('U'), Free;
    StackedQueries => "stacked_queries", "--technique", TechniqueBit('S'), Free;
    TimeBased => "time_based", "--technique", TechniqueBit('T'), Free;
    InlineQueries => "inline_queries", "--technique", TechniqueBit('Q'), Free;
    TimeSec => "time_sec", "--time-sec", Valued, Integer { min: 1, max: Some(3600) };
    UnionCols => "union_cols", "--union-cols", Valued, Free;
    UnionChar => "union_char", "--union-char", Valued, Free;
    UnionFrom => "union_from", "--union-from", Valued, Free;
    DnsDomain => "dns_domain", "--dns-domain", Valued, Free;
    SecondUrl => "second_url", "--second-url", Valued, Free;
    SecondReq => "second_req", "--second-req", Valued, Free;

    // Fingerprint
    Fingerprint => "fingerprint", "--fingerprint", Boolean, Free;

    // Enumeration
    All => "all", "--all", Boolean, Free;
    Banner => "banner", "--banner", Boolean, Free;
    CurrentUser => "current_user", "--current-user", Boolean, Free;
    CurrentDb => "current_db", "--current-db", Boolean, Free;
    Hostname => "hostname", "--hostname", Boolean, Free;
    IsDba => "is_dba", "--is-dba", Boolean, Free;
    Users => "users", "--users", Boolean, Free;
    Passwords => "passwords", "--passwords", Boolean, Free;
    Privileges => "privileges", "--privileges", Boolean, Free;
    Roles => "roles", "--roles", Boolean, Free;
    Dbs => "dbs", "--dbs", Boolean, Free;
    Tables => "tables", "--tables", Boolean, Free;
    Columns => "columns", "--columns", Boolean, Free;
    Schema => "schema", "--schema", Boolean, Free;
    Count => "count", "--count", Boolean, Free;
    Dump => "dump", "--dump", Boolean, Free;
    DumpAll => "dump_all", "--dump-all", Boolean, Free;
    Search => "search", "--search", Boolean, Free;
    Comments => "comments", "--comments", Boolean, Free;
    Statements => "statements", "--statements", Boolean, Free;
    Db => "db", "-D", Valued, Free;
    Tbl => "tbl", "-T", Valued, Free;
    Col => "col", "-C", Valued, Free;
    User => "user", "-U", Valued, Free;
    ExcludeSysdbs => "exclude_sysdbs", "--exclude-sysdbs", Boolean, Free;
    PivotColumn => "pivot_column", "--pivot-column", Valued, Free;
    Where => "where", "--where", Valued, Free;
    Start => "start", "--start", Valued, Integer { min: 1, max: None };
    Stop => "stop", "--stop", Valued, Integer { min: 1, max: None };
    First => "first", "--first", Valued, Integer { min: 1, max: None };
    Last => "last", "--last", Valued, Integer { min: 1, max: None };
    SqlQuery => "sql_query", "--sql-query", Valued, Free;
    SqlShell => "sql_shell", "--sql-shell", Boolean, Free;
    SqlFile => "sql_file", "--sql-file", Valued, ExistingFile;

    // Brute force
    CommonTables => "common_tables", "--common-tables", Boolean, Free;
    CommonColumns => "common_columns", "--common-columns", Boolean, Free;
    CommonFiles => "common_files", "--common-files", Boolean, Free;

    // User-defined functions
    UdfInject => "udf_inject", "--udf-inject", Boolean, Free;
    SharedLib => "shared_lib", "--shared-lib", Valued, Free;

    // File system access
    FileRead => "file_read", "--file-read", Valued, Free;
    FileWrite => "file_write", "--file-write", Valued, Free;
    FileDest => "file_dest", "--file-dest", Valued, Free;

    // Operating system access
    OsCmd => "os_cmd", "--os-cmd", Valued, Free;
    OsShell => "os_shell", "--os-shell", Boolean, Free;
    OsPwn => "os_pwn", "--os-pwn", Boolean, Free;
    OsSmbrelay => "os_smbrelay", "--os-smbrelay", Boolean, Free;
    OsBof => "os_bof", "--os-bof", Boolean, Free;
    PrivEsc => "priv_esc", "--priv-esc", Boolean, Free;
    MsfPath => "msf_path", "--msf-path", Valued, Free;
    TmpPath => "tmp_path", "--tmp-path", Valued, Free;

    // Windows registry access
    RegRead => "reg_read", "--reg-read", Boolean, Free;
    RegAdd => "reg_add", "--reg-add", Boolean, Free;
    RegDel => "reg_del", "--reg-del", Boolean, Free;
    RegKey => "reg_key", "--reg-key", Valued, Free;
    RegValue => "reg_value", "--reg-value", Valued, Free;
    RegData => "reg_data", "--reg-data", Valued, Free;
    RegType => "reg_type", "--reg-type", Valued, Choice { values: REG_TYPES, strict: true };

    // General
    SessionFile => "session_file", "-s", Valued, Free;
    TrafficFile => "traffic_file", "-t", Valued, Free;
    Answers => "answers", "--answers", Valued, Free;
    Batch => "batch", "--batch", Boolean, Free;
    Base64 => "base64", "--base64", Valued, Free;
    Base64Safe => "base64_safe", "--base64-safe", Boolean, Free;
    Charset => "charset", "--charset", Valued, Free;
    Crawl => "crawl", "--crawl", Valued, Integer { min: 0, max: Some(10) };
    CrawlExclude => "crawl_exclude", "--crawl-exclude", Valued, Free;
    DumpFormat => "dump_format", "--dump-format", Valued, Choice { values: DUMP_FORMATS, strict: true };
    Encoding => "encoding", "--encoding", Valued, Free;
    FlushSession => "flush_session", "--flush-session", Boolean, Free;
    Forms => "forms", "--forms", Boolean, Free;
    FreshQueries => "fresh_queries", "--fresh-queries", Boolean, Free;
    OutputDir => "output_dir", "--output-dir", Valued, ExistingDirectory;
    TmpDir => "tmp_dir", "--tmp-dir", Valued, ExistingDirectory;
    Cleanup => "cleanup", "--cleanup", Boolean, Free;
    WebRoot => "web_root", "--web-root", Valued, Free;
    Verbose => "verbose", "-v", Valued, Integer { min: 0, max: Some(6) };
    Gpage => "gpage", "--gpage", Valued, Integer { min: 1, max: None };
    AbortOnEmpty => "abort_on_empty", "--abort-on-empty", Boolean, Free;

    // Miscellaneous
    Alert => "alert", "--alert", Valued, Free;
    Beep => "beep", "--beep", Boolean, Free;
    Dependencies => "dependencies", "--dependencies", Boolean, Free;
    DisableColoring => "disable_coloring", "--disable-coloring", Boolean, Free;
    Offline => "offline", "--offline", Boolean, Free;
    Purge => "purge", "--purge", Boolean, Free;
    SkipHeuristics => "skip_heuristics", "--skip-heuristics", Boolean, Free;
    SkipWaf => "skip_waf", "--skip-waf", Boolean, Free;
    Unstable => "unstable", "--unstable", Boolean, Free;
    Wizard => "wizard", "--wizard", Boolean, Free;
    ListTampers => "list_tampers", "--list-tampers", Boolean, Free;

    // Front-end bookkeeping, never emitted
    AutoBatch => "auto_batch", "--batch", Bookkeeping, Free;
}

/// Short-form flags and their long-form aliases accepted on a raw command line.
pub const FLAG_ALIASES: &[(&str, &str)] = &[
    ("-u", "--url"),
    ("-d", "--direct"),
    ("-r", "--requestfile"),
    ("-l", "--logfile"),
    ("-m", "--bulkfile"),
    ("-g", "--googledork"),
    ("-c", "--configfile"),
    ("-s", "--sessionfile"),
    ("-t", "--trafficfile"),
    ("-v", "--verbose"),
    ("-D", "--db"),
    ("-T", "--tbl"),
    ("-C", "--col"),
    ("-U", "--user"),
    ("-X", "--exclude"),
    ("-A", "--user-agent"),
    ("-H", "--headers"),
    ("-o", "--optimize"),
];

/// Options that designate what the external tool should scan.
pub const TARGET_OPTIONS: &[OptionName] = &[
    OptionName::Url,
    OptionName::Direct,
    OptionName::LogFile,
    OptionName::BulkFile,
    OptionName::RequestFile,
    OptionName::GoogleDork,
    OptionName::ConfigFile,
];

/// Valued options whose values keep the external tool's own URL/connection grammar and
/// are therefore emitted without shell quoting.
pub const UNQUOTED_OPTIONS: &[OptionName] = &[
    OptionName::Url,
    OptionName::Direct,
    OptionName::SecondUrl,
    OptionName::Proxy,
];
