//! Endpoint registry for the metamob API
//!
//! Maps logical resource names to URL path templates. Resolution is a pure
//! function: it builds the request path from the supplied parameters and
//! performs no I/O.

use thiserror::Error;

/// Errors raised while resolving an endpoint to a request path
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The logical endpoint name is not part of the registry
    #[error("Unknown endpoint: '{0}'")]
    UnknownEndpoint(String),

    /// A placeholder required by the path template was not supplied
    #[error("Endpoint '{endpoint}' requires the '{param}' parameter")]
    MissingParameter {
        endpoint: &'static str,
        param: &'static str,
    },
}

/// The resources exposed by the metamob API
///
/// Each variant corresponds to one path template on the provider. Keeping
/// them as an enum makes the per-endpoint normalizer dispatch exhaustive:
/// adding a resource forces a decision about how its payload is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// All registered users (`/utilisateurs`)
    Users,
    /// A single user looked up by pseudo (`/utilisateurs/{pseudo}`)
    User,
    /// The monsters a user seeks or offers (`/utilisateurs/{pseudo}/monstres`)
    UserMonsters,
    /// The monster compendium (`/monstres`)
    Monsters,
    /// A single monster looked up by id (`/monstres/{id}`)
    Monster,
    /// All game servers (`/serveurs`)
    Servers,
    /// A single server looked up by id (`/serveurs/{id}`)
    Server,
    /// The kralamoure calendar (`/kralamoures`)
    Kralas,
    /// A single kralamoure event looked up by id (`/kralamoures/{id}`)
    Krala,
    /// All zones (`/zones`)
    Areas,
    /// All subzones (`/souszones`)
    Subareas,
}

impl Endpoint {
    /// Returns the logical name used on the configuration surface
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Users => "users",
            Endpoint::User => "user",
            Endpoint::UserMonsters => "user_monsters",
            Endpoint::Monsters => "monsters",
            Endpoint::Monster => "monster",
            Endpoint::Servers => "servers",
            Endpoint::Server => "server",
            Endpoint::Kralas => "kralas",
            Endpoint::Krala => "krala",
            Endpoint::Areas => "areas",
            Endpoint::Subareas => "subareas",
        }
    }

    /// Looks up an endpoint by its logical name
    ///
    /// # Returns
    /// * `Ok(Endpoint)` if the name is registered
    /// * `Err(EndpointError::UnknownEndpoint)` otherwise
    pub fn from_name(name: &str) -> Result<Self, EndpointError> {
        match name {
            "users" => Ok(Endpoint::Users),
            "user" => Ok(Endpoint::User),
            "user_monsters" => Ok(Endpoint::UserMonsters),
            "monsters" => Ok(Endpoint::Monsters),
            "monster" => Ok(Endpoint::Monster),
            "servers" => Ok(Endpoint::Servers),
            "server" => Ok(Endpoint::Server),
            "kralas" => Ok(Endpoint::Kralas),
            "krala" => Ok(Endpoint::Krala),
            "areas" => Ok(Endpoint::Areas),
            "subareas" => Ok(Endpoint::Subareas),
            other => Err(EndpointError::UnknownEndpoint(other.to_string())),
        }
    }

    /// Resolves the endpoint to a request path
    ///
    /// # Arguments
    /// * `pseudo` - User pseudo, required by the user-scoped templates
    /// * `id` - Resource id, required by the id-scoped templates
    ///
    /// # Returns
    /// * `Ok(String)` - The resolved path, e.g. `/utilisateurs/Garfunk/monstres`
    /// * `Err(EndpointError::MissingParameter)` - If a required placeholder
    ///   was not supplied
    pub fn resolve(&self, pseudo: Option<&str>, id: Option<u64>) -> Result<String, EndpointError> {
        match self {
            Endpoint::Users => Ok("/utilisateurs".to_string()),
            Endpoint::User => {
                let pseudo = self.require_pseudo(pseudo)?;
                Ok(format!("/utilisateurs/{}", pseudo))
            }
            Endpoint::UserMonsters => {
                let pseudo = self.require_pseudo(pseudo)?;
                Ok(format!("/utilisateurs/{}/monstres", pseudo))
            }
            Endpoint::Monsters => Ok("/monstres".to_string()),
            Endpoint::Monster => Ok(format!("/monstres/{}", self.require_id(id)?)),
            Endpoint::Servers => Ok("/serveurs".to_string()),
            Endpoint::Server => Ok(format!("/serveurs/{}", self.require_id(id)?)),
            Endpoint::Kralas => Ok("/kralamoures".to_string()),
            Endpoint::Krala => Ok(format!("/kralamoures/{}", self.require_id(id)?)),
            Endpoint::Areas => Ok("/zones".to_string()),
            Endpoint::Subareas => Ok("/souszones".to_string()),
        }
    }

    fn require_pseudo<'a>(&self, pseudo: Option<&'a str>) -> Result<&'a str, EndpointError> {
        pseudo.ok_or(EndpointError::MissingParameter {
            endpoint: self.name(),
            param: "pseudo",
        })
    }

    fn require_id(&self, id: Option<u64>) -> Result<u64, EndpointError> {
        id.ok_or(EndpointError::MissingParameter {
            endpoint: self.name(),
            param: "id",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_endpoints_resolve_without_parameters() {
        assert_eq!(
            Endpoint::Users.resolve(None, None).unwrap(),
            "/utilisateurs"
        );
        assert_eq!(Endpoint::Monsters.resolve(None, None).unwrap(), "/monstres");
        assert_eq!(Endpoint::Servers.resolve(None, None).unwrap(), "/serveurs");
        assert_eq!(
            Endpoint::Kralas.resolve(None, None).unwrap(),
            "/kralamoures"
        );
        assert_eq!(Endpoint::Areas.resolve(None, None).unwrap(), "/zones");
        assert_eq!(
            Endpoint::Subareas.resolve(None, None).unwrap(),
            "/souszones"
        );
    }

    #[test]
    fn test_pseudo_endpoints_substitute_pseudo() {
        assert_eq!(
            Endpoint::User.resolve(Some("Garfunk"), None).unwrap(),
            "/utilisateurs/Garfunk"
        );
        assert_eq!(
            Endpoint::UserMonsters.resolve(Some("Garfunk"), None).unwrap(),
            "/utilisateurs/Garfunk/monstres"
        );
    }

    #[test]
    fn test_id_endpoints_substitute_id() {
        assert_eq!(
            Endpoint::Monster.resolve(None, Some(5)).unwrap(),
            "/monstres/5"
        );
        assert_eq!(
            Endpoint::Server.resolve(None, Some(12)).unwrap(),
            "/serveurs/12"
        );
        assert_eq!(
            Endpoint::Krala.resolve(None, Some(3)).unwrap(),
            "/kralamoures/3"
        );
    }

    #[test]
    fn test_missing_pseudo_is_an_error() {
        let err = Endpoint::UserMonsters.resolve(None, None).unwrap_err();
        assert_eq!(
            err,
            EndpointError::MissingParameter {
                endpoint: "user_monsters",
                param: "pseudo",
            }
        );
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let err = Endpoint::Krala.resolve(None, None).unwrap_err();
        assert_eq!(
            err,
            EndpointError::MissingParameter {
                endpoint: "krala",
                param: "id",
            }
        );
    }

    #[test]
    fn test_from_name_round_trips_every_endpoint() {
        let endpoints = [
            Endpoint::Users,
            Endpoint::User,
            Endpoint::UserMonsters,
            Endpoint::Monsters,
            Endpoint::Monster,
            Endpoint::Servers,
            Endpoint::Server,
            Endpoint::Kralas,
            Endpoint::Krala,
            Endpoint::Areas,
            Endpoint::Subareas,
        ];

        for endpoint in endpoints {
            assert_eq!(Endpoint::from_name(endpoint.name()).unwrap(), endpoint);
        }
    }

    #[test]
    fn test_from_name_rejects_unknown_names() {
        let err = Endpoint::from_name("potions").unwrap_err();
        assert_eq!(err, EndpointError::UnknownEndpoint("potions".to_string()));
        assert!(err.to_string().contains("potions"));
    }
}
