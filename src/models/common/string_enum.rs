/// 定义以 snake_case 字符串存储和传输的枚举
///
/// 自动生成：
/// - Serialize / TS（每个变体按给定字符串重命名）
/// - Deserialize（未知值返回带候选列表的错误）
/// - Display / FromStr / as_str()
#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", $label)),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "无效的{}: '{s}'. 支持的值: {}",
                        $label,
                        [$($value),+].join(", ")
                    ))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_string_enum! {
        #[ts(export_to = "test.ts")]
        enum Sample("sample") {
            First => "first",
            SecondValue => "second_value",
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("second_value".parse::<Sample>(), Ok(Sample::SecondValue));
        assert_eq!(Sample::First.to_string(), "first");
        assert!("third".parse::<Sample>().is_err());
        assert_eq!(Sample::ALL.len(), 2);
    }

    #[test]
    fn test_serde_uses_string_values() {
        let json = serde_json::to_string(&Sample::SecondValue).expect("serialize");
        assert_eq!(json, "\"second_value\"");
        let err = serde_json::from_str::<Sample>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("first, second_value"));
    }
}
