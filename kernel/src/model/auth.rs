pub struct AccessToken(pub String);
